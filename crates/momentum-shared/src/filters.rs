use std::collections::BTreeSet;

use serde::{
  Deserialize,
  Serialize
};

use crate::model::{
  DepartmentId,
  EmployeeId,
  PriorityId,
  Status,
  Task
};

pub const DEFAULT_FILTER_KEY: &str =
  "momentum.filters";

/// String key-value storage scoped to the
/// browser session.
pub trait KeyValueStore {
  fn read(&self, key: &str) -> Option<String>;
  fn write(&self, key: &str, value: &str);
}

impl<T> KeyValueStore for &T
where
  T: KeyValueStore + ?Sized
{
  fn read(&self, key: &str) -> Option<String> {
    (**self).read(key)
  }

  fn write(&self, key: &str, value: &str) {
    (**self).write(key, value);
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
pub enum FilterDimension {
  Department,
  Priority,
  Employee
}

#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct FilterSelection {
  #[serde(default)]
  pub departments: BTreeSet<DepartmentId>,
  #[serde(default)]
  pub priorities:  BTreeSet<PriorityId>,
  #[serde(default)]
  pub employee:    Option<EmployeeId>
}

impl FilterSelection {
  pub fn is_empty(&self) -> bool {
    self.departments.is_empty()
      && self.priorities.is_empty()
      && self.employee.is_none()
  }

  pub fn matches(&self, task: &Task) -> bool {
    let department_match =
      self.departments.is_empty()
        || self
          .departments
          .contains(&task.department.id);
    let priority_match =
      self.priorities.is_empty()
        || self
          .priorities
          .contains(&task.priority.id);
    let employee_match = self
      .employee
      .is_none_or(|id| task.employee.id == id);

    department_match
      && priority_match
      && employee_match
  }

  pub fn visible<'a>(
    &self,
    tasks: &'a [Task]
  ) -> Vec<&'a Task> {
    tasks
      .iter()
      .filter(|task| self.matches(task))
      .collect()
  }

  /// Applied values in display order, one
  /// chip per value.
  pub fn chips(
    &self
  ) -> Vec<(FilterDimension, u64)> {
    let departments =
      self.departments.iter().map(|id| {
        (FilterDimension::Department, *id)
      });
    let priorities =
      self.priorities.iter().map(|id| {
        (FilterDimension::Priority, *id)
      });
    let employee = self
      .employee
      .map(|id| (FilterDimension::Employee, id));

    departments
      .chain(priorities)
      .chain(employee)
      .collect()
  }
}

/// Holds the applied filters and writes
/// every change through to the session
/// store.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStore<S> {
  store:     S,
  key:       String,
  selection: FilterSelection
}

impl<S: KeyValueStore> FilterStore<S> {
  pub fn load(store: S, key: &str) -> Self {
    let selection = load_selection(&store, key);
    Self {
      store,
      key: key.to_string(),
      selection
    }
  }

  pub fn selection(&self) -> &FilterSelection {
    &self.selection
  }

  pub fn set_departments(
    &mut self,
    ids: BTreeSet<DepartmentId>
  ) {
    self.selection.departments = ids;
    self.persist();
  }

  pub fn set_priorities(
    &mut self,
    ids: BTreeSet<PriorityId>
  ) {
    self.selection.priorities = ids;
    self.persist();
  }

  pub fn set_employee(
    &mut self,
    id: Option<EmployeeId>
  ) {
    self.selection.employee = id;
    self.persist();
  }

  /// Drops a single applied value. Clearing
  /// the employee ignores `id` unless it is
  /// the selected one.
  pub fn remove(
    &mut self,
    dimension: FilterDimension,
    id: u64
  ) {
    match dimension {
      | FilterDimension::Department => {
        self.selection.departments.remove(&id);
      }
      | FilterDimension::Priority => {
        self.selection.priorities.remove(&id);
      }
      | FilterDimension::Employee => {
        if self.selection.employee == Some(id) {
          self.selection.employee = None;
        }
      }
    }
    self.persist();
  }

  pub fn clear(&mut self) {
    self.selection = FilterSelection::default();
    self.persist();
  }

  pub fn visible<'a>(
    &self,
    tasks: &'a [Task]
  ) -> Vec<&'a Task> {
    self.selection.visible(tasks)
  }

  fn persist(&self) {
    save_selection(
      &self.store,
      &self.key,
      &self.selection
    );
  }
}

pub fn load_selection<S>(
  store: &S,
  key: &str
) -> FilterSelection
where
  S: KeyValueStore + ?Sized
{
  let Some(raw) = store.read(key) else {
    return FilterSelection::default();
  };

  match serde_json::from_str::<FilterSelection>(
    &raw
  ) {
    | Ok(selection) => {
      tracing::debug!(
        ?selection,
        "restored task filters"
      );
      selection
    }
    | Err(error) => {
      tracing::warn!(
        %error,
        "failed parsing stored task filters; \
         starting empty"
      );
      FilterSelection::default()
    }
  }
}

pub fn save_selection<S>(
  store: &S,
  key: &str,
  selection: &FilterSelection
) where
  S: KeyValueStore + ?Sized
{
  match serde_json::to_string(selection) {
    | Ok(json) => store.write(key, &json),
    | Err(error) => tracing::error!(
      %error,
      "failed encoding task filters"
    )
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusColumn<'a> {
  pub status: &'a Status,
  pub tasks:  Vec<&'a Task>
}

/// One column per status in the order the
/// API lists them. Tasks whose status is
/// unknown are left out.
pub fn group_by_status<'a>(
  statuses: &'a [Status],
  tasks: &[&'a Task]
) -> Vec<StatusColumn<'a>> {
  statuses
    .iter()
    .map(|status| StatusColumn {
      status,
      tasks: tasks
        .iter()
        .copied()
        .filter(|task| task.status.id == status.id)
        .collect()
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::collections::BTreeMap;

  use super::*;
  use crate::model::{
    Department,
    Employee,
    Priority
  };

  #[derive(Default)]
  struct MemoryStore {
    entries:
      RefCell<BTreeMap<String, String>>
  }

  impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
      self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
      self
        .entries
        .borrow_mut()
        .insert(key.to_string(), value.to_string());
    }
  }

  fn task(
    id: u64,
    status: u64,
    department: u64,
    priority: u64,
    employee: u64
  ) -> Task {
    Task {
      id,
      name: format!("task {id}"),
      description: None,
      due_date: "2026-12-01".to_string(),
      status: Status {
        id:   status,
        name: format!("status {status}")
      },
      department: Department {
        id:   department,
        name: format!("department {department}"),
        icon: None
      },
      priority: Priority {
        id:   priority,
        name: format!("priority {priority}"),
        icon: None
      },
      employee: Employee {
        id:         employee,
        name:       "Lika".to_string(),
        surname:    "Gelashvili".to_string(),
        avatar:     None,
        department: None
      },
      total_comments: 0
    }
  }

  fn ids(tasks: &[&Task]) -> Vec<u64> {
    tasks.iter().map(|task| task.id).collect()
  }

  #[test]
  fn empty_selection_shows_everything() {
    let tasks = vec![
      task(1, 1, 1, 1, 1),
      task(2, 2, 2, 2, 2),
      task(3, 3, 3, 3, 3),
    ];
    let selection = FilterSelection::default();

    assert!(selection.is_empty());
    assert_eq!(
      ids(&selection.visible(&tasks)),
      vec![1, 2, 3]
    );
  }

  #[test]
  fn department_filter_scenario() {
    let tasks =
      vec![task(1, 1, 3, 1, 1), task(2, 1, 1, 1, 1)];
    let selection = FilterSelection {
      departments: BTreeSet::from([3]),
      ..FilterSelection::default()
    };

    assert_eq!(
      ids(&selection.visible(&tasks)),
      vec![1]
    );
  }

  #[test]
  fn dimensions_combine_conjunctively() {
    let tasks = vec![
      task(1, 1, 1, 1, 7),
      task(2, 1, 1, 2, 7),
      task(3, 1, 2, 1, 7),
      task(4, 1, 1, 1, 8),
    ];
    let selection = FilterSelection {
      departments: BTreeSet::from([1]),
      priorities:  BTreeSet::from([1]),
      employee:    Some(7)
    };

    assert_eq!(
      ids(&selection.visible(&tasks)),
      vec![1]
    );

    for candidate in &tasks {
      let expected = selection
        .departments
        .contains(&candidate.department.id)
        && selection
          .priorities
          .contains(&candidate.priority.id)
        && selection.employee
          == Some(candidate.employee.id);
      assert_eq!(selection.matches(candidate), expected);
    }
  }

  #[test]
  fn multiple_values_in_a_dimension_are_alternatives(
  ) {
    let tasks = vec![
      task(1, 1, 1, 1, 1),
      task(2, 1, 1, 2, 1),
      task(3, 1, 1, 3, 1),
    ];
    let selection = FilterSelection {
      priorities: BTreeSet::from([1, 3]),
      ..FilterSelection::default()
    };

    assert_eq!(
      ids(&selection.visible(&tasks)),
      vec![1, 3]
    );
  }

  #[test]
  fn every_change_is_persisted_and_restored() {
    let backing = MemoryStore::default();
    {
      let mut store =
        FilterStore::load(&backing, DEFAULT_FILTER_KEY);
      store.set_departments(BTreeSet::from([2, 5]));
      store.set_priorities(BTreeSet::from([1]));
      store.set_employee(Some(9));
      store.remove(FilterDimension::Department, 5);
    }

    let reloaded =
      FilterStore::load(&backing, DEFAULT_FILTER_KEY);
    assert_eq!(
      reloaded.selection(),
      &FilterSelection {
        departments: BTreeSet::from([2]),
        priorities:  BTreeSet::from([1]),
        employee:    Some(9)
      }
    );
  }

  #[test]
  fn missing_or_corrupt_storage_starts_empty() {
    let backing = MemoryStore::default();
    assert!(
      load_selection(&backing, DEFAULT_FILTER_KEY)
        .is_empty()
    );

    backing.write(DEFAULT_FILTER_KEY, "{oops");
    assert!(
      load_selection(&backing, DEFAULT_FILTER_KEY)
        .is_empty()
    );
  }

  #[test]
  fn removing_other_employee_keeps_selection() {
    let backing = MemoryStore::default();
    let mut store =
      FilterStore::load(&backing, DEFAULT_FILTER_KEY);
    store.set_employee(Some(4));

    store.remove(FilterDimension::Employee, 5);
    assert_eq!(store.selection().employee, Some(4));

    store.remove(FilterDimension::Employee, 4);
    assert_eq!(store.selection().employee, None);
  }

  #[test]
  fn clear_resets_every_dimension() {
    let backing = MemoryStore::default();
    let mut store =
      FilterStore::load(&backing, DEFAULT_FILTER_KEY);
    store.set_departments(BTreeSet::from([1]));
    store.set_employee(Some(2));
    store.clear();

    assert!(store.selection().is_empty());
    assert!(
      load_selection(&backing, DEFAULT_FILTER_KEY)
        .is_empty()
    );
  }

  #[test]
  fn chips_list_departments_then_priorities_then_employee(
  ) {
    let selection = FilterSelection {
      departments: BTreeSet::from([4, 2]),
      priorities:  BTreeSet::from([1]),
      employee:    Some(8)
    };

    assert_eq!(
      selection.chips(),
      vec![
        (FilterDimension::Department, 2),
        (FilterDimension::Department, 4),
        (FilterDimension::Priority, 1),
        (FilterDimension::Employee, 8),
      ]
    );
  }

  #[test]
  fn columns_follow_status_order() {
    let statuses = vec![
      Status { id: 2, name: "In progress".to_string() },
      Status { id: 1, name: "To do".to_string() },
    ];
    let tasks = vec![
      task(1, 1, 1, 1, 1),
      task(2, 2, 1, 1, 1),
      task(3, 1, 1, 1, 1),
      task(4, 9, 1, 1, 1),
    ];
    let refs: Vec<&Task> = tasks.iter().collect();
    let columns = group_by_status(&statuses, &refs);

    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0].status.id, 2);
    assert_eq!(ids(&columns[0].tasks), vec![2]);
    assert_eq!(ids(&columns[1].tasks), vec![1, 3]);
  }
}
