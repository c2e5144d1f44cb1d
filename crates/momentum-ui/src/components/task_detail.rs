use momentum_shared::comments::{
  Placement,
  build_threads,
  reconcile_confirmed,
  thread_size
};
use momentum_shared::model::{
  CommentId,
  StatusId,
  TaskId,
  format_due_date,
  image_src
};
use momentum_shared::validation::validate_comment;
use momentum_shared::{
  Comment,
  Status,
  Task,
  TaskStatusUpdate
};
use std::rc::Rc;

use web_sys::HtmlSelectElement;
use yew::{
  Callback,
  Event,
  Html,
  Properties,
  Reducible,
  TargetCast,
  UseReducerHandle,
  UseStateHandle,
  function_component,
  html,
  use_context,
  use_effect_with,
  use_node_ref,
  use_reducer,
  use_state
};

use super::{
  CommentComposer,
  CommentThread,
  EmployeeAvatar
};
use crate::api::ApiClient;
use crate::app::{
  AppContext,
  ui_debug
};

#[derive(Properties, PartialEq)]
pub struct TaskDetailProps {
  pub task_id:        TaskId,
  /// Scroll to the comment section once the
  /// page has loaded.
  #[prop_or_default]
  pub focus_comments: bool
}

#[function_component(TaskDetail)]
pub fn task_detail(props: &TaskDetailProps) -> Html {
  let context = use_context::<AppContext>()
    .expect("AppContext is provided by App");
  let task_id = props.task_id;

  let task = use_state(|| None::<Task>);
  let statuses = use_state(Vec::<Status>::new);
  let comments = use_reducer(CommentList::default);
  let load_error = use_state(|| None::<String>);
  let status_error = use_state(|| None::<String>);
  let comment_error = use_state(|| None::<String>);
  let posting = use_state(|| false);
  let comments_ref = use_node_ref();

  {
    let task = task.clone();
    let statuses = statuses.clone();
    let comments = comments.clone();
    let load_error = load_error.clone();
    let api = context.api.clone();

    use_effect_with(task_id, move |task_id| {
      let task_id = *task_id;
      task.set(None);
      load_error.set(None);
      wasm_bindgen_futures::spawn_local(async move {
        match api.load_task_page(task_id).await {
          | Ok(page) => {
            let threads = build_threads(page.comments);
            statuses.set(page.statuses);
            comments.dispatch(CommentAction::Replace(threads.comments));
            task.set(Some(page.task));
          }
          | Err(error) => {
            tracing::error!(task_id, %error, "task page load failed");
            load_error.set(Some(error.to_string()));
          }
        }
      });
      || ()
    });
  }

  // Refetch after a reply whose parent is not
  // in the local tree.
  {
    let comments = comments.clone();
    let comment_error = comment_error.clone();
    let api = context.api.clone();

    use_effect_with(comments.refetch, move |tick| {
      let tick = *tick;
      if tick > 0 {
        wasm_bindgen_futures::spawn_local(async move {
          tracing::info!(task_id, tick, "refetching comments");
          match api.list_comments(task_id).await {
            | Ok(raw) => comments.dispatch(CommentAction::Replace(
              build_threads(raw).comments
            )),
            | Err(error) => comment_error.set(Some(error.to_string()))
          }
        });
      }
      || ()
    });
  }

  {
    let comments_ref = comments_ref.clone();
    let loaded = task.is_some();
    use_effect_with(
      (props.focus_comments, loaded),
      move |(focus, loaded)| {
        if *focus && *loaded {
          if let Some(element) = comments_ref.cast::<web_sys::Element>() {
            element.scroll_into_view();
          }
        }
        || ()
      }
    );
  }

  let on_status_change = {
    let task = task.clone();
    let shown_status = task.as_ref().map(|task| task.status.id);
    let status_error = status_error.clone();
    let api = context.api.clone();
    Callback::from(move |event: Event| {
      let select: HtmlSelectElement = event.target_unchecked_into();
      let Ok(status_id) = select.value().parse::<u64>() else {
        return;
      };
      ui_debug("detail.status", &format!("task {task_id} -> status {status_id}"));

      let task = task.clone();
      let status_error = status_error.clone();
      let api = api.clone();
      wasm_bindgen_futures::spawn_local(async move {
        let payload = TaskStatusUpdate { status_id };
        match api.update_task_status(task_id, &payload).await {
          | Ok(updated) => {
            status_error.set(None);
            task.set(Some(updated));
          }
          | Err(error) => {
            // The select already shows the
            // rejected choice; put it back.
            if let Some(previous) = shown_status {
              select.set_value(&status_value(previous));
            }
            status_error.set(Some(error.to_string()));
          }
        }
      });
    })
  };

  let post = PostComment {
    api: context.api.clone(),
    task_id,
    comments: comments.clone(),
    comment_error: comment_error.clone(),
    posting: posting.clone()
  };
  let on_comment = {
    let post = post.clone();
    Callback::from(move |text: String| post.submit(&text, None))
  };
  let on_reply = Callback::from(
    move |(parent_id, text): (CommentId, String)| {
      post.submit(&text, Some(parent_id));
    }
  );

  if let Some(message) = (*load_error).clone() {
    return html! {
        <div class="page-error">
            <h2>{ "Could not load this task" }</h2>
            <p>{ message }</p>
        </div>
    };
  }

  let Some(task) = (*task).clone() else {
    return html! { <div class="loading">{ "Loading task…" }</div> };
  };

  html! {
      <div class="task-detail">
          <section class="task-info">
              <div class="task-labels">
                  <span class="priority">
                      if let Some(icon) = image_src(task.priority.icon.as_deref()) {
                          <img src={icon} alt="" />
                      }
                      { &task.priority.name }
                  </span>
                  <span class="department">{ &task.department.name }</span>
              </div>
              <h1>{ &task.name }</h1>
              <p class="description">{ task.description_text() }</p>

              <dl class="task-meta">
                  <dt>{ "Status" }</dt>
                  <dd>
                      <select onchange={on_status_change}>
                          {
                              for statuses.iter().map(|status| html! {
                                  <option
                                      key={status.id.to_string()}
                                      value={status_value(status.id)}
                                      selected={status.id == task.status.id}
                                  >
                                      { &status.name }
                                  </option>
                              })
                          }
                      </select>
                      if let Some(message) = (*status_error).clone() {
                          <p class="inline-error">{ message }</p>
                      }
                  </dd>
                  <dt>{ "Employee" }</dt>
                  <dd class="assignee">
                      <EmployeeAvatar employee={task.employee.clone()} />
                      <span>{ task.employee.full_name() }</span>
                  </dd>
                  <dt>{ "Due date" }</dt>
                  <dd>{ format_due_date(&task.due_date) }</dd>
              </dl>
          </section>

          <section class="task-comments" ref={comments_ref}>
              <CommentComposer
                  placeholder="Write a comment"
                  submit_label="Comment"
                  busy={*posting}
                  on_submit={on_comment}
              />
              if let Some(message) = (*comment_error).clone() {
                  <p class="inline-error">{ message }</p>
              }
              <h3>{ format!("Comments ({})", thread_size(&comments.comments)) }</h3>
              <CommentThread
                  comments={comments.comments.clone()}
                  on_reply={on_reply}
                  busy={*posting}
              />
          </section>
      </div>
  }
}

/// `<option>` value of a status. A failed
/// change restores the select through it.
fn status_value(id: StatusId) -> String {
  id.to_string()
}

/// Comment tree of the open task. Confirmed
/// comments are applied to the list as it is
/// when the response lands, not as it was
/// when the post started.
#[derive(Debug, Clone, Default, PartialEq)]
struct CommentList {
  comments: Vec<Comment>,
  /// Bumped when a confirmed reply has no
  /// parent in `comments`.
  refetch:  u64
}

enum CommentAction {
  Apply(Comment),
  Replace(Vec<Comment>)
}

impl Reducible for CommentList {
  type Action = CommentAction;

  fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
    match action {
      | CommentAction::Replace(comments) => Rc::new(Self {
        comments,
        refetch: self.refetch
      }),
      | CommentAction::Apply(confirmed) => {
        let mut next = (*self).clone();
        match reconcile_confirmed(&mut next.comments, confirmed) {
          | Placement::Orphaned { parent_id } => {
            tracing::warn!(parent_id, "reply parent missing; refetching");
            next.refetch += 1;
            Rc::new(next)
          }
          | Placement::AlreadyPresent => self,
          | Placement::TopLevel | Placement::Reply { .. } => {
            Rc::new(next)
          }
        }
      }
    }
  }
}

/// Handles shared by the comment and reply
/// composers.
#[derive(Clone)]
struct PostComment {
  api:           ApiClient,
  task_id:       TaskId,
  comments:      UseReducerHandle<CommentList>,
  comment_error: UseStateHandle<Option<String>>,
  posting:       UseStateHandle<bool>
}

impl PostComment {
  /// Validates, posts, then applies the
  /// comment the server confirmed. The typed
  /// text is not restored on failure.
  fn submit(&self, text: &str, parent_id: Option<CommentId>) {
    let payload = match validate_comment(text, parent_id) {
      | Ok(payload) => payload,
      | Err(errors) => {
        self.comment_error.set(Some(errors.to_string()));
        return;
      }
    };

    let post = self.clone();
    post.posting.set(true);
    post.comment_error.set(None);
    wasm_bindgen_futures::spawn_local(async move {
      tracing::info!(
        task_id = post.task_id,
        target = %crate::api::describe_target(parent_id),
        "posting comment"
      );
      let result = post
        .api
        .create_comment(post.task_id, &payload)
        .await;
      post.posting.set(false);

      let confirmed = match result {
        | Ok(confirmed) => confirmed,
        | Err(error) => {
          post.comment_error.set(Some(error.to_string()));
          return;
        }
      };

      post.comments.dispatch(CommentAction::Apply(confirmed));
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn comment(
    id: CommentId,
    parent_id: Option<CommentId>
  ) -> Comment {
    Comment {
      id,
      text: format!("comment {id}"),
      task_id: 4,
      parent_id,
      author_avatar: None,
      author_nickname: "nika".to_string(),
      created_at: None,
      sub_comments: vec![]
    }
  }

  #[test]
  fn confirmed_reply_lands_on_refetched_list() {
    let stale = Rc::new(CommentList {
      comments: vec![comment(1, None)],
      refetch:  1
    });
    let fresh = stale.reduce(CommentAction::Replace(vec![
      comment(1, None),
      comment(2, None),
    ]));
    let applied = fresh.reduce(CommentAction::Apply(comment(3, Some(2))));

    let top: Vec<CommentId> =
      applied.comments.iter().map(|entry| entry.id).collect();
    assert_eq!(top, vec![1, 2]);
    assert_eq!(applied.comments[1].sub_comments[0].id, 3);
    assert_eq!(applied.refetch, 1);
  }

  #[test]
  fn orphaned_reply_requests_refetch() {
    let list = Rc::new(CommentList {
      comments: vec![comment(1, None)],
      refetch:  0
    });
    let next = list.reduce(CommentAction::Apply(comment(9, Some(5))));

    assert_eq!(next.refetch, 1);
    assert_eq!(thread_size(&next.comments), 1);
  }

  #[test]
  fn failed_status_change_restores_shown_option() {
    let statuses = [1_u64, 2, 3];
    let shown = 2;
    let restored = status_value(shown);

    let matching: Vec<u64> = statuses
      .into_iter()
      .filter(|id| status_value(*id) == restored)
      .collect();
    assert_eq!(matching, vec![2]);
  }

  #[test]
  fn duplicate_echo_keeps_state() {
    let list = Rc::new(CommentList {
      comments: vec![comment(1, None)],
      refetch:  0
    });
    let next = list.clone().reduce(CommentAction::Apply(comment(1, None)));
    assert!(Rc::ptr_eq(&list, &next));
  }
}
