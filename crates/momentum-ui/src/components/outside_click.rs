use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use gloo::events::EventListener;
use momentum_shared::widgets::{
  RegionId,
  RegionRegistry
};
use wasm_bindgen::JsCast;
use yew::{
  Callback,
  Children,
  ContextProvider,
  Html,
  NodeRef,
  Properties,
  function_component,
  hook,
  html,
  use_context,
  use_effect,
  use_effect_with,
  use_memo
};

#[derive(Default)]
struct Regions {
  registry: RegionRegistry,
  handlers: BTreeMap<RegionId, (NodeRef, Callback<()>)>
}

/// Handle to the single document-level
/// outside-click listener.
#[derive(Clone, Default)]
pub struct OutsideClick {
  inner: Rc<RefCell<Regions>>
}

impl PartialEq for OutsideClick {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.inner, &other.inner)
  }
}

impl OutsideClick {
  fn register(&self) -> RegionId {
    self.inner.borrow_mut().registry.register()
  }

  fn unregister(&self, id: RegionId) {
    let mut regions = self.inner.borrow_mut();
    regions.registry.unregister(id);
    regions.handlers.remove(&id);
  }

  fn update(
    &self,
    id: RegionId,
    node: NodeRef,
    open: bool,
    on_outside: Callback<()>
  ) {
    let mut regions = self.inner.borrow_mut();
    regions.registry.set_open(id, open);
    regions.handlers.insert(id, (node, on_outside));
  }

  fn dispatch(&self, target: &web_sys::Node) {
    let callbacks: Vec<Callback<()>> = {
      let mut regions = self.inner.borrow_mut();
      let inside: Vec<RegionId> = regions
        .handlers
        .iter()
        .filter(|(_, (node, _))| {
          node
            .cast::<web_sys::Node>()
            .is_some_and(|node| node.contains(Some(target)))
        })
        .map(|(id, _)| *id)
        .collect();
      let closed = regions.registry.dispatch_click(&inside);
      closed
        .iter()
        .filter_map(|id| {
          regions
            .handlers
            .get(id)
            .map(|(_, callback)| callback.clone())
        })
        .collect()
    };

    for callback in callbacks {
      callback.emit(());
    }
  }
}

#[derive(Properties, PartialEq)]
pub struct OutsideClickProviderProps {
  #[prop_or_default]
  pub children: Children
}

#[function_component(OutsideClickProvider)]
pub fn outside_click_provider(
  props: &OutsideClickProviderProps
) -> Html {
  let regions = use_memo((), |_| OutsideClick::default());

  {
    let regions = (*regions).clone();
    use_effect_with((), move |_| {
      let listener = web_sys::window()
        .and_then(|window| window.document())
        .map(|document| {
          EventListener::new(&document, "mousedown", move |event| {
            if let Some(target) = event
              .target()
              .and_then(|target| target.dyn_into::<web_sys::Node>().ok())
            {
              regions.dispatch(&target);
            }
          })
        });
      if listener.is_none() {
        tracing::warn!("no document; outside clicks will not close widgets");
      }
      move || drop(listener)
    });
  }

  html! {
      <ContextProvider<OutsideClick> context={(*regions).clone()}>
          { props.children.clone() }
      </ContextProvider<OutsideClick>>
  }
}

/// Calls `on_outside` when a mousedown lands
/// outside `node` while `open` is set.
#[hook]
pub fn use_outside_click(
  node: NodeRef,
  open: bool,
  on_outside: Callback<()>
) {
  let regions = use_context::<OutsideClick>();
  let region = {
    let regions = regions.clone();
    use_memo((), move |_| {
      regions.map(|regions| regions.register())
    })
  };

  {
    let regions = regions.clone();
    let region = *region;
    use_effect_with((), move |_| {
      move || {
        if let (Some(regions), Some(id)) = (regions, region) {
          regions.unregister(id);
        }
      }
    });
  }

  let region = *region;
  use_effect(move || {
    if let (Some(regions), Some(id)) = (regions, region) {
      regions.update(id, node, open, on_outside);
    }
    || ()
  });
}
