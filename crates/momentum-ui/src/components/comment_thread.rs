use momentum_shared::Comment;
use momentum_shared::model::{
  CommentId,
  format_comment_time,
  image_src
};
use web_sys::HtmlTextAreaElement;
use yew::{
  AttrValue,
  Callback,
  Html,
  InputEvent,
  MouseEvent,
  Properties,
  TargetCast,
  function_component,
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct CommentComposerProps {
  pub placeholder:  AttrValue,
  pub submit_label: AttrValue,
  pub on_submit:    Callback<String>,
  #[prop_or_default]
  pub busy:         bool
}

/// Text area plus submit button. The text is
/// cleared as soon as it is handed to
/// `on_submit`.
#[function_component(CommentComposer)]
pub fn comment_composer(
  props: &CommentComposerProps
) -> Html {
  let text = use_state(String::new);

  let oninput = {
    let text = text.clone();
    Callback::from(move |event: InputEvent| {
      let input: HtmlTextAreaElement =
        event.target_unchecked_into();
      text.set(input.value());
    })
  };

  let onclick = {
    let text = text.clone();
    let on_submit = props.on_submit.clone();
    Callback::from(move |_: MouseEvent| {
      on_submit.emit((*text).clone());
      text.set(String::new());
    })
  };

  html! {
      <div class="composer">
          <textarea
              placeholder={props.placeholder.clone()}
              value={(*text).clone()}
              {oninput}
          />
          <button
              class="btn primary"
              disabled={props.busy || text.trim().is_empty()}
              {onclick}
          >
              { props.submit_label.clone() }
          </button>
      </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct CommentThreadProps {
  pub comments: Vec<Comment>,
  /// `(parent_id, text)` of a reply.
  pub on_reply: Callback<(CommentId, String)>,
  #[prop_or_default]
  pub busy:     bool
}

/// Top-level comments with their replies.
/// At most one reply composer is open at a
/// time.
#[function_component(CommentThread)]
pub fn comment_thread(props: &CommentThreadProps) -> Html {
  let replying_to = use_state(|| None::<CommentId>);

  if props.comments.is_empty() {
    return html! { <p class="muted">{ "No comments yet." }</p> };
  }

  html! {
      <ul class="comment-list">
          {
              for props.comments.iter().map(|comment| {
                  let id = comment.id;
                  let open = *replying_to == Some(id);
                  let on_toggle = {
                      let replying_to = replying_to.clone();
                      Callback::from(move |_: MouseEvent| {
                          replying_to.set((!open).then_some(id));
                      })
                  };
                  let on_submit = {
                      let replying_to = replying_to.clone();
                      let on_reply = props.on_reply.clone();
                      Callback::from(move |text: String| {
                          replying_to.set(None);
                          on_reply.emit((id, text));
                      })
                  };

                  html! {
                      <li class="comment" key={id.to_string()}>
                          { comment_body(comment) }
                          <button class="btn link reply" onclick={on_toggle}>
                              { if open { "Cancel" } else { "Reply" } }
                          </button>
                          if open {
                              <CommentComposer
                                  placeholder="Write a reply"
                                  submit_label="Reply"
                                  busy={props.busy}
                                  on_submit={on_submit}
                              />
                          }
                          if !comment.sub_comments.is_empty() {
                              <ul class="replies">
                                  {
                                      for comment.sub_comments.iter().map(|reply| html! {
                                          <li class="comment reply" key={reply.id.to_string()}>
                                              { comment_body(reply) }
                                          </li>
                                      })
                                  }
                              </ul>
                          }
                      </li>
                  }
              })
          }
      </ul>
  }
}

fn comment_body(comment: &Comment) -> Html {
  let posted_at = comment
    .created_at
    .as_deref()
    .map(format_comment_time)
    .unwrap_or_default();

  html! {
      <div class="comment-body">
          if let Some(src) = image_src(comment.author_avatar.as_deref()) {
              <img class="avatar" src={src} alt="" />
          }
          <div>
              <strong>{ &comment.author_nickname }</strong>
              if !posted_at.is_empty() {
                  <time class="muted">{ posted_at }</time>
              }
              <p>{ &comment.text }</p>
          </div>
      </div>
  }
}
