//! Dropdown and date picker state machines.
//!
//! Multi-select stages changes until
//! confirmed; single-select and the date
//! picker commit on choice. Closing on an
//! outside click goes through
//! [`RegionRegistry`].

use std::collections::{
  BTreeMap,
  BTreeSet
};

use chrono::{
  Datelike,
  Duration,
  Months,
  NaiveDate
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelect {
  open:   bool,
  staged: BTreeSet<u64>
}

impl MultiSelect {
  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn staged(&self) -> &BTreeSet<u64> {
    &self.staged
  }

  pub fn is_staged(&self, id: u64) -> bool {
    self.staged.contains(&id)
  }

  /// Opens with a copy of what the parent
  /// has committed.
  pub fn open(&mut self, committed: &BTreeSet<u64>) {
    self.open = true;
    self.staged = committed.clone();
  }

  pub fn toggle(&mut self, id: u64) {
    if !self.open {
      return;
    }
    if !self.staged.remove(&id) {
      self.staged.insert(id);
    }
  }

  /// Returns the selection to commit.
  pub fn confirm(&mut self) -> Option<BTreeSet<u64>> {
    if !self.open {
      return None;
    }
    self.open = false;
    Some(std::mem::take(&mut self.staged))
  }

  pub fn dismiss(&mut self) {
    self.open = false;
    self.staged.clear();
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleSelect {
  open: bool
}

impl SingleSelect {
  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn toggle(&mut self) {
    self.open = !self.open;
  }

  pub fn dismiss(&mut self) {
    self.open = false;
  }

  pub fn choose<T>(&mut self, value: T) -> Option<T> {
    if !self.open {
      return None;
    }
    self.open = false;
    Some(value)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePicker {
  open:     bool,
  month:    NaiveDate,
  min_date: Option<NaiveDate>
}

impl DatePicker {
  /// `focus` decides which month is shown
  /// first.
  pub fn new(
    focus: NaiveDate,
    min_date: Option<NaiveDate>
  ) -> Self {
    Self {
      open: false,
      month: first_of_month(focus),
      min_date
    }
  }

  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn month(&self) -> NaiveDate {
    self.month
  }

  pub fn title(&self) -> String {
    self.month.format("%B %Y").to_string()
  }

  pub fn toggle(&mut self) {
    self.open = !self.open;
  }

  pub fn dismiss(&mut self) {
    self.open = false;
  }

  pub fn next_month(&mut self) {
    if let Some(next) =
      self.month.checked_add_months(Months::new(1))
    {
      self.month = next;
    }
  }

  pub fn previous_month(&mut self) {
    if let Some(previous) =
      self.month.checked_sub_months(Months::new(1))
    {
      self.month = previous;
    }
  }

  pub fn is_selectable(&self, date: NaiveDate) -> bool {
    self.min_date.is_none_or(|min| date >= min)
  }

  /// Monday-first weeks covering the shown
  /// month. Cells outside the month are
  /// `None`.
  pub fn weeks(&self) -> Vec<[Option<NaiveDate>; 7]> {
    let lead =
      self.month.weekday().num_days_from_monday() as i64;
    let mut cursor = self.month - Duration::days(lead);
    let mut weeks = Vec::new();

    loop {
      let mut week = [None; 7];
      for slot in &mut week {
        if cursor.month() == self.month.month() {
          *slot = Some(cursor);
        }
        cursor += Duration::days(1);
      }
      weeks.push(week);
      if cursor.month() != self.month.month() {
        break;
      }
    }
    weeks
  }

  pub fn choose(
    &mut self,
    date: NaiveDate
  ) -> Option<NaiveDate> {
    if !self.is_selectable(date) {
      return None;
    }
    self.open = false;
    self.month = first_of_month(date);
    Some(date)
  }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
  date.with_day(1).unwrap_or(date)
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct RegionId(u32);

/// Open/closed bookkeeping for every widget
/// that closes on an outside click. One
/// document listener asks the registry which
/// regions a click escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionRegistry {
  next:    u32,
  regions: BTreeMap<RegionId, bool>
}

impl RegionRegistry {
  pub fn register(&mut self) -> RegionId {
    let id = RegionId(self.next);
    self.next += 1;
    self.regions.insert(id, false);
    id
  }

  pub fn unregister(&mut self, id: RegionId) {
    self.regions.remove(&id);
  }

  pub fn set_open(&mut self, id: RegionId, open: bool) {
    if let Some(state) = self.regions.get_mut(&id) {
      *state = open;
    }
  }

  pub fn is_open(&self, id: RegionId) -> bool {
    self.regions.get(&id).copied().unwrap_or(false)
  }

  /// `inside` lists the regions that contain
  /// the click target. Every other open region
  /// is closed and returned.
  pub fn dispatch_click(
    &mut self,
    inside: &[RegionId]
  ) -> Vec<RegionId> {
    let mut closed = Vec::new();
    for (id, open) in &mut self.regions {
      if *open && !inside.contains(id) {
        *open = false;
        closed.push(*id);
      }
    }
    closed
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
  }

  #[test]
  fn multi_select_commits_only_on_confirm() {
    let committed = BTreeSet::from([1]);
    let mut select = MultiSelect::default();
    select.open(&committed);
    select.toggle(2);
    select.toggle(1);

    assert_eq!(select.staged(), &BTreeSet::from([2]));
    assert_eq!(committed, BTreeSet::from([1]));
    assert_eq!(
      select.confirm(),
      Some(BTreeSet::from([2]))
    );
    assert!(!select.is_open());
    assert_eq!(select.confirm(), None);
  }

  #[test]
  fn multi_select_dismiss_discards_staging() {
    let mut select = MultiSelect::default();
    select.open(&BTreeSet::new());
    select.toggle(5);
    select.dismiss();

    assert!(select.staged().is_empty());
    select.toggle(6);
    assert!(!select.is_staged(6));
  }

  #[test]
  fn single_select_commits_immediately() {
    let mut select = SingleSelect::default();
    assert_eq!(select.choose(3), None);

    select.toggle();
    assert_eq!(select.choose(3), Some(3));
    assert!(!select.is_open());
  }

  #[test]
  fn date_picker_grid_starts_on_monday() {
    // February 2026 starts on a Sunday.
    let picker = DatePicker::new(date(2026, 2, 14), None);
    let weeks = picker.weeks();

    assert_eq!(picker.title(), "February 2026");
    assert!(weeks[0][..6].iter().all(Option::is_none));
    assert_eq!(weeks[0][6], Some(date(2026, 2, 1)));
    let days: usize = weeks
      .iter()
      .map(|week| week.iter().flatten().count())
      .sum();
    assert_eq!(days, 28);
    assert_eq!(
      weeks.last().and_then(|week| week[5]),
      Some(date(2026, 2, 28))
    );
  }

  #[test]
  fn date_picker_blocks_past_days() {
    let today = date(2026, 10, 19);
    let mut picker = DatePicker::new(today, Some(today));
    picker.toggle();

    assert_eq!(picker.choose(date(2026, 10, 18)), None);
    assert!(picker.is_open());
    assert_eq!(picker.choose(today), Some(today));
    assert!(!picker.is_open());
  }

  #[test]
  fn date_picker_navigates_across_years() {
    let mut picker =
      DatePicker::new(date(2026, 12, 31), None);
    picker.next_month();
    assert_eq!(picker.month(), date(2027, 1, 1));
    picker.previous_month();
    picker.previous_month();
    assert_eq!(picker.month(), date(2026, 11, 1));
  }

  #[test]
  fn outside_click_closes_only_escaped_regions() {
    let mut registry = RegionRegistry::default();
    let departments = registry.register();
    let priorities = registry.register();
    let employees = registry.register();
    registry.set_open(departments, true);
    registry.set_open(priorities, true);

    let closed = registry.dispatch_click(&[priorities]);
    assert_eq!(closed, vec![departments]);
    assert!(registry.is_open(priorities));
    assert!(!registry.is_open(employees));

    registry.unregister(priorities);
    assert!(registry.dispatch_click(&[]).is_empty());
  }
}
