//! Filtering and derived summaries over a document

use chrono::{Duration, Local, NaiveDate};

use crate::class_tag::ClassId;
use crate::document::Document;
use crate::task::Task;

/// How a task listing is ordered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TaskOrder {
    /// Alphabetical by title, the ordering of calendar-cell listings
    #[default]
    Title,
    /// By day, then time, then title, the ordering of agenda listings.
    /// Within a day, tasks without a time come after the timed ones.
    Date,
}

/// Criteria for [`Document::tasks_matching`]. Every dimension is optional, and they combine.
///
/// ```
/// use chalkboard::{Document, TaskFilter, TaskOrder};
///
/// let doc = Document::default();
/// let filter = TaskFilter::default()
///     .matching_text("essay")
///     .hide_completed()
///     .order_by(TaskOrder::Date);
/// assert_eq!(doc.tasks_matching(&filter).count(), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TaskFilter {
    date: Option<NaiveDate>,
    class: Option<ClassId>,
    text: Option<String>,
    hide_completed: bool,
    due_range: Option<(NaiveDate, NaiveDate)>,
    order: TaskOrder,
}

impl TaskFilter {
    /// Keep only tasks on this exact day
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Keep only tasks filed under this class. Not calling this means "all classes".
    pub fn in_class(mut self, class: ClassId) -> Self {
        self.class = Some(class);
        self
    }

    /// Keep only tasks whose title, notes or class name contain this text
    /// (case-insensitive)
    pub fn matching_text<S: AsRef<str>>(mut self, text: S) -> Self {
        self.text = Some(text.as_ref().to_lowercase());
        self
    }

    /// Drop completed tasks
    pub fn hide_completed(mut self) -> Self {
        self.hide_completed = true;
        self
    }

    /// Keep only tasks due within the next `days` days of `today` (inclusive on
    /// both ends), the agenda horizon
    pub fn due_within(mut self, today: NaiveDate, days: u32) -> Self {
        self.due_range = Some((today, today + Duration::days(i64::from(days))));
        self
    }

    pub fn order_by(mut self, order: TaskOrder) -> Self {
        self.order = order;
        self
    }

    fn accepts(&self, document: &Document, task: &Task) -> bool {
        if let Some(date) = self.date {
            if task.date() != date {
                return false;
            }
        }
        if let Some(class) = &self.class {
            if task.class_id() != class {
                return false;
            }
        }
        if self.hide_completed && task.done() {
            return false;
        }
        if let Some((from, until)) = self.due_range {
            if task.date() < from || task.date() > until {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let class_name = document
                .class(task.class_id())
                .map(|class| class.name().to_lowercase())
                .unwrap_or_default();
            let matches = task.title().to_lowercase().contains(text)
                || task.notes().to_lowercase().contains(text)
                || class_name.contains(text);
            if matches == false {
                return false;
            }
        }
        true
    }
}

impl Document {
    /// The tasks matching `filter`, ordered as it requests.
    ///
    /// The sequence borrows the document; call again to restart it.
    pub fn tasks_matching<'a>(&'a self, filter: &TaskFilter) -> impl Iterator<Item = &'a Task> {
        let mut selected: Vec<&Task> = self
            .tasks()
            .iter()
            .filter(|task| filter.accepts(self, task))
            .collect();

        match filter.order {
            TaskOrder::Title => {
                selected.sort_by_key(|task| task.title().to_lowercase());
            }
            TaskOrder::Date => {
                selected.sort_by_key(|task| {
                    (task.date(), task.time().is_none(), task.time(), task.title().to_lowercase())
                });
            }
        }

        selected.into_iter()
    }

    /// Convenience for agenda views: every not-yet-completed task due within the
    /// next `days` days of `today`, in date order.
    pub fn upcoming<'a>(&'a self, today: NaiveDate, days: u32) -> impl Iterator<Item = &'a Task> {
        self.tasks_matching(
            &TaskFilter::default()
                .due_within(today, days)
                .hide_completed()
                .order_by(TaskOrder::Date),
        )
    }

    /// The rounded percentage of tasks on `date` that are done; `0` when the day
    /// has no tasks at all.
    pub fn completion_percent(&self, date: NaiveDate) -> u32 {
        let mut total = 0u32;
        let mut done = 0u32;
        for task in self.tasks().iter().filter(|task| task.date() == date) {
            total += 1;
            if task.done() {
                done += 1;
            }
        }
        if total == 0 {
            return 0;
        }
        ((f64::from(done) / f64::from(total)) * 100.0).round() as u32
    }

    /// The completion streak: consecutive days, walking backward from `today`, with
    /// at least one completed task dated that day.
    ///
    /// A day with no tasks at all breaks the streak exactly like a day where nothing
    /// got completed.
    pub fn streak_through(&self, today: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut day = today;
        loop {
            let completed_one = self
                .tasks()
                .iter()
                .any(|task| task.date() == day && task.done());
            if completed_one == false {
                break;
            }
            streak += 1;
            day = match day.pred_opt() {
                Some(previous) => previous,
                None => break,
            };
        }
        streak
    }

    /// [`Self::streak_through`] today's local date
    pub fn streak(&self) -> u32 {
        self.streak_through(Local::now().date_naive())
    }
}
