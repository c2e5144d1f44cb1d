//! One-level comment threads.
//!
//! Top-level comments own their replies in
//! `sub_comments`; replies never own
//! anything. Every function here keeps that
//! shape.

use crate::model::{
  Comment,
  CommentId
};

/// Where a confirmed comment ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
  TopLevel,
  Reply { parent_id: CommentId },
  /// The id is already in the tree; nothing
  /// was inserted.
  AlreadyPresent,
  /// The parent is not a top-level comment
  /// of this list. The tree is unchanged and
  /// the caller should refetch.
  Orphaned { parent_id: CommentId }
}

impl Placement {
  pub fn inserted(self) -> bool {
    matches!(
      self,
      Self::TopLevel | Self::Reply { .. }
    )
  }
}

/// Inserts `comment` as a reply to
/// `reply_to`, or at the end of the
/// top-level sequence when `reply_to` is
/// `None`. Only the matching top-level entry
/// is touched.
pub fn insert_comment(
  comments: &mut Vec<Comment>,
  mut comment: Comment,
  reply_to: Option<CommentId>
) -> Placement {
  if contains_comment(comments, comment.id) {
    tracing::debug!(
      comment_id = comment.id,
      "comment already in thread"
    );
    return Placement::AlreadyPresent;
  }

  let Some(parent_id) = reply_to else {
    comment.parent_id = None;
    comments.push(comment);
    return Placement::TopLevel;
  };

  let Some(parent) = comments
    .iter_mut()
    .find(|entry| entry.id == parent_id)
  else {
    tracing::warn!(
      comment_id = comment.id,
      parent_id,
      "reply target is not a top-level \
       comment of this thread"
    );
    return Placement::Orphaned { parent_id };
  };

  comment.parent_id = Some(parent_id);
  comment.sub_comments.clear();
  parent.sub_comments.push(comment);
  Placement::Reply { parent_id }
}

/// Applies a comment exactly as the server
/// echoed it back, keyed by its real id and
/// parent id.
pub fn reconcile_confirmed(
  comments: &mut Vec<Comment>,
  confirmed: Comment
) -> Placement {
  let parent_id = confirmed.parent_id;
  insert_comment(comments, confirmed, parent_id)
}

/// Pure variant of [`insert_comment`] for
/// state handles that hold an immutable
/// snapshot.
pub fn with_comment(
  comments: &[Comment],
  comment: Comment,
  reply_to: Option<CommentId>
) -> (Vec<Comment>, Placement) {
  let mut next = comments.to_vec();
  let placement =
    insert_comment(&mut next, comment, reply_to);
  (next, placement)
}

pub fn contains_comment(
  comments: &[Comment],
  id: CommentId
) -> bool {
  comments.iter().any(|entry| {
    entry.id == id
      || entry
        .sub_comments
        .iter()
        .any(|reply| reply.id == id)
  })
}

/// Total number of comments, replies
/// included.
pub fn thread_size(comments: &[Comment]) -> usize {
  comments
    .iter()
    .map(|entry| 1 + entry.sub_comments.len())
    .sum()
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Threads {
  pub comments: Vec<Comment>,
  pub orphans:  usize
}

/// Normalizes a server response into the
/// one-level tree. The input may be flat
/// (replies listed next to their parents),
/// nested, or a mix. Replies to replies are
/// attached to the owning top-level comment.
pub fn build_threads(raw: Vec<Comment>) -> Threads {
  let mut flat = Vec::new();
  for mut comment in raw {
    let nested =
      std::mem::take(&mut comment.sub_comments);
    flat.push(comment);
    for mut reply in nested {
      let deeper =
        std::mem::take(&mut reply.sub_comments);
      flat.push(reply);
      flat.extend(deeper);
    }
  }

  let mut threads = Threads::default();
  let mut pending = Vec::new();
  for comment in flat {
    if comment.is_top_level() {
      if !contains_comment(
        &threads.comments,
        comment.id
      ) {
        threads.comments.push(comment);
      }
    } else {
      pending.push(comment);
    }
  }

  // Replies whose parent is itself a reply
  // resolve once that parent has landed.
  loop {
    let before = pending.len();
    let mut unresolved = Vec::new();
    for reply in pending {
      let owner = reply
        .parent_id
        .and_then(|id| owner_of(&threads, id));
      match owner {
        | Some(owner) => {
          attach_reply(
            &mut threads.comments,
            reply,
            owner
          );
        }
        | None => unresolved.push(reply)
      }
    }
    pending = unresolved;
    if pending.is_empty()
      || pending.len() == before
    {
      break;
    }
  }

  if !pending.is_empty() {
    tracing::warn!(
      orphans = pending.len(),
      "dropping replies without a parent"
    );
  }
  threads.orphans = pending.len();
  threads
}

/// Files `reply` under the top-level comment
/// `owner` while keeping the parent id the
/// server sent, which may name another reply.
fn attach_reply(
  comments: &mut [Comment],
  mut reply: Comment,
  owner: CommentId
) {
  if contains_comment(comments, reply.id) {
    return;
  }
  if let Some(entry) = comments
    .iter_mut()
    .find(|entry| entry.id == owner)
  {
    reply.sub_comments.clear();
    entry.sub_comments.push(reply);
  }
}

fn owner_of(
  threads: &Threads,
  id: CommentId
) -> Option<CommentId> {
  threads.comments.iter().find_map(|entry| {
    let owns = entry.id == id
      || entry
        .sub_comments
        .iter()
        .any(|reply| reply.id == id);
    owns.then_some(entry.id)
  })
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
      task_id: 1,
      parent_id,
      author_avatar: None,
      author_nickname: "tester".to_string(),
      created_at: None,
      sub_comments: vec![]
    }
  }

  fn ids(comments: &[Comment]) -> Vec<CommentId> {
    comments.iter().map(|entry| entry.id).collect()
  }

  #[test]
  fn top_level_comment_is_appended_last() {
    let mut list =
      vec![comment(1, None), comment(2, None)];
    let placement = insert_comment(
      &mut list,
      comment(3, None),
      None
    );

    assert_eq!(placement, Placement::TopLevel);
    assert_eq!(ids(&list), vec![1, 2, 3]);
  }

  #[test]
  fn reply_only_touches_its_parent() {
    let mut first = comment(1, None);
    first.sub_comments.push(comment(10, Some(1)));
    let list = vec![
      first,
      comment(2, None),
      comment(3, None),
    ];

    let (next, placement) = with_comment(
      &list,
      comment(11, None),
      Some(1)
    );

    assert_eq!(
      placement,
      Placement::Reply { parent_id: 1 }
    );
    assert_eq!(ids(&next), vec![1, 2, 3]);
    assert_eq!(
      ids(&next[0].sub_comments),
      vec![10, 11]
    );
    assert_eq!(next[0].sub_comments[1].parent_id, Some(1));
    assert_eq!(next[1], list[1]);
    assert_eq!(next[2], list[2]);
  }

  #[test]
  fn reply_to_missing_parent_leaves_tree_unchanged(
  ) {
    let list =
      vec![comment(1, None), comment(2, None)];
    let (next, placement) = with_comment(
      &list,
      comment(9, Some(5)),
      Some(5)
    );

    assert_eq!(
      placement,
      Placement::Orphaned { parent_id: 5 }
    );
    assert!(!placement.inserted());
    assert_eq!(next, list);
  }

  #[test]
  fn reply_to_a_reply_is_orphaned() {
    let mut parent = comment(1, None);
    parent.sub_comments.push(comment(2, Some(1)));
    let mut list = vec![parent];

    let placement = insert_comment(
      &mut list,
      comment(3, Some(2)),
      Some(2)
    );
    assert_eq!(
      placement,
      Placement::Orphaned { parent_id: 2 }
    );
    assert_eq!(thread_size(&list), 2);
  }

  #[test]
  fn duplicate_ids_are_never_inserted() {
    let mut parent = comment(1, None);
    parent.sub_comments.push(comment(2, Some(1)));
    let mut list = vec![parent];

    assert_eq!(
      insert_comment(
        &mut list,
        comment(2, Some(1)),
        Some(1)
      ),
      Placement::AlreadyPresent
    );
    assert_eq!(
      insert_comment(&mut list, comment(1, None), None),
      Placement::AlreadyPresent
    );
    assert_eq!(thread_size(&list), 2);
  }

  #[test]
  fn reconcile_uses_server_parent_id() {
    let mut list =
      vec![comment(1, None), comment(2, None)];
    let placement = reconcile_confirmed(
      &mut list,
      comment(7, Some(2))
    );

    assert_eq!(
      placement,
      Placement::Reply { parent_id: 2 }
    );
    assert!(list[0].sub_comments.is_empty());
    assert_eq!(ids(&list[1].sub_comments), vec![7]);
  }

  #[test]
  fn inserted_reply_never_keeps_children() {
    let mut list = vec![comment(1, None)];
    let mut reply = comment(2, Some(1));
    reply.sub_comments.push(comment(3, Some(2)));

    insert_comment(&mut list, reply, Some(1));
    assert!(
      list[0].sub_comments[0].sub_comments.is_empty()
    );
  }

  #[test]
  fn build_threads_keeps_echoed_parent_of_deep_reply() {
    let threads = build_threads(vec![
      comment(1, None),
      comment(2, Some(1)),
      comment(3, Some(2)),
    ]);

    assert_eq!(threads.orphans, 0);
    assert_eq!(
      ids(&threads.comments[0].sub_comments),
      vec![2, 3]
    );
    assert_eq!(
      threads.comments[0].sub_comments[0].parent_id,
      Some(1)
    );
    assert_eq!(
      threads.comments[0].sub_comments[1].parent_id,
      Some(2)
    );
  }

  #[test]
  fn build_threads_nests_flat_replies_in_order() {
    let threads = build_threads(vec![
      comment(1, None),
      comment(2, Some(1)),
      comment(3, None),
      comment(4, Some(1)),
      comment(5, Some(3)),
    ]);

    assert_eq!(threads.orphans, 0);
    assert_eq!(ids(&threads.comments), vec![1, 3]);
    assert_eq!(
      ids(&threads.comments[0].sub_comments),
      vec![2, 4]
    );
    assert_eq!(
      ids(&threads.comments[1].sub_comments),
      vec![5]
    );
  }

  #[test]
  fn build_threads_keeps_nested_payloads() {
    let mut top = comment(1, None);
    top.sub_comments = vec![comment(2, Some(1))];
    let threads =
      build_threads(vec![top, comment(3, None)]);

    assert_eq!(thread_size(&threads.comments), 3);
    assert_eq!(
      ids(&threads.comments[0].sub_comments),
      vec![2]
    );
  }

  #[test]
  fn build_threads_flattens_deeper_replies() {
    let threads = build_threads(vec![
      comment(1, None),
      comment(3, Some(2)),
      comment(2, Some(1)),
    ]);

    assert_eq!(threads.orphans, 0);
    assert_eq!(
      ids(&threads.comments[0].sub_comments),
      vec![2, 3]
    );
    let parents: Vec<Option<CommentId>> = threads
      .comments[0]
      .sub_comments
      .iter()
      .map(|reply| reply.parent_id)
      .collect();
    assert_eq!(parents, vec![Some(1), Some(2)]);
  }

  #[test]
  fn build_threads_drops_orphans() {
    let threads = build_threads(vec![
      comment(1, None),
      comment(2, Some(40)),
    ]);

    assert_eq!(threads.orphans, 1);
    assert_eq!(thread_size(&threads.comments), 1);
  }
}
