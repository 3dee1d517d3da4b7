//! Filtering, sorting and pagination over the two collections.

use std::ops::RangeInclusive;
use std::str::FromStr;

use clap::ValueEnum;

use crate::fields::*;
use crate::literature::Literature;
use crate::task::Task;

/// Criteria for the literature list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiteratureQuery {
    pub search: String,
    pub filter: LiteratureFilter,
    /// Tag to match exactly (case-insensitive).
    pub category: Option<String>,
}

impl LiteratureQuery {
    pub fn matches(&self, item: &Literature, recent_since_year: i32) -> bool {
        self.matches_search(item) && self.matches_filter(item, recent_since_year) && self.matches_category(item)
    }

    fn matches_search(&self, item: &Literature) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(&needle);
        hit(&item.title)
            || hit(&item.authors)
            || hit(&item.journal)
            || hit(&item.abstract_text)
            || item.tags.iter().any(|t| hit(t))
            || item.doi.as_deref().is_some_and(hit)
    }

    fn matches_filter(&self, item: &Literature, recent_since_year: i32) -> bool {
        match self.filter {
            LiteratureFilter::All => true,
            LiteratureFilter::Saved => item.saved,
            LiteratureFilter::Recent => item.year >= recent_since_year,
            LiteratureFilter::Status(s) => item.status == s,
        }
    }

    fn matches_category(&self, item: &Literature) -> bool {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(tag) => item.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)),
        }
    }

    /// Matching entries, newest year first. Equal years keep store order.
    pub fn apply<'a>(&self, items: &'a [Literature], recent_since_year: i32) -> Vec<&'a Literature> {
        let mut out: Vec<&Literature> = items.iter().filter(|i| self.matches(i, recent_since_year)).collect();
        out.sort_by(|a, b| b.year.cmp(&a.year));
        out
    }
}

/// Criteria for the task list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    pub search: String,
    pub status: Option<TaskStatus>,
    pub phase: Option<Phase>,
    pub priority: Option<Priority>,
}

impl TaskQuery {
    pub fn matches(&self, task: &Task) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || task.name.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
            || task.deliverable.to_lowercase().contains(&needle);
        search_ok
            && self.status.is_none_or(|s| task.status == s)
            && self.phase.is_none_or(|p| task.phase == p)
            && self.priority.is_none_or(|p| task.priority == p)
    }

    /// Matching tasks in store order.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }

    /// Fold one `key:value` filter (`phase:I`, `status:complete`,
    /// `priority:high`) into the query. `all` clears the field filters.
    pub fn apply_filter_expr(&mut self, expr: &str) -> Result<(), String> {
        let expr = expr.trim();
        if expr.eq_ignore_ascii_case("all") {
            self.status = None;
            self.phase = None;
            self.priority = None;
            return Ok(());
        }
        let (key, value) = expr
            .split_once(':')
            .ok_or_else(|| format!("expected key:value filter, got '{}'", expr))?;
        match key.trim().to_lowercase().as_str() {
            "phase" => self.phase = Some(Phase::from_str(value.trim(), true)?),
            "status" => self.status = Some(TaskStatus::from_str(value.trim(), true)?),
            "priority" => self.priority = Some(Priority::from_str(value.trim(), true)?),
            other => return Err(format!("unknown filter key '{}'", other)),
        }
        Ok(())
    }
}

impl FromStr for TaskQuery {
    type Err = String;

    /// Parse a whitespace-separated list of `key:value` filters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut q = TaskQuery::default();
        for part in s.split_whitespace() {
            q.apply_filter_expr(part)?;
        }
        Ok(q)
    }
}

/// Tasks sorted by due date, earliest first.
pub fn timeline(tasks: &[Task]) -> Vec<&Task> {
    let mut out: Vec<&Task> = tasks.iter().collect();
    out.sort_by_key(|t| t.due_date);
    out
}

/// Tasks grouped into one column per phase, in phase order.
pub fn board(tasks: &[Task]) -> Vec<(Phase, Vec<&Task>)> {
    Phase::ALL
        .iter()
        .map(|&p| (p, tasks.iter().filter(|t| t.phase == p).collect()))
        .collect()
}

/// Board columns for printing: phases holding tasks, plus `focus` even when empty.
pub fn board_columns(tasks: &[Task], focus: Option<Phase>) -> Vec<(Phase, Vec<&Task>)> {
    board(tasks)
        .into_iter()
        .filter(|(phase, column)| !column.is_empty() || focus == Some(*phase))
        .collect()
}

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, already clamped.
    pub page: usize,
    /// 0 when the input is empty.
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    /// 1-based positions of the first and last item shown, for "Showing X-Y of Z".
    pub fn shown_range(&self, page_size: usize) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.page - 1) * page_size + 1;
        Some((first, first + self.items.len() - 1))
    }
}

/// Slice out page `page` (1-based) of `items`.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));
    let start = ((page - 1) * page_size).min(total_items);
    let end = (start + page_size).min(total_items);
    Page {
        items: items[start..end].to_vec(),
        page,
        total_pages,
        total_items,
    }
}

/// Page numbers to show around `current`, at most `max_visible` of them.
pub fn page_window(current: usize, total: usize, max_visible: usize) -> RangeInclusive<usize> {
    if total == 0 || max_visible == 0 {
        return 1..=0;
    }
    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let mut end = start + max_visible - 1;
    if end > total {
        end = total;
        start = end.saturating_sub(max_visible - 1).max(1);
    }
    start..=end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literature::sample_literature;
    use crate::task::sample_tasks;

    fn library() -> Vec<Literature> {
        let mut items = sample_literature();
        let mut old = items[0].clone();
        old.id = 3;
        old.year = 2019;
        old.saved = false;
        old.status = LiteratureStatus::ToRead;
        old.tags = vec!["Policy".into()];
        old.doi = Some("10.1000/xyz".into());
        items.push(old);
        items
    }

    #[test]
    fn test_literature_search_covers_doi_and_tags() {
        let items = library();
        let q = LiteratureQuery { search: "XYZ".into(), ..Default::default() };
        assert_eq!(q.apply(&items, 2023).iter().map(|i| i.id).collect::<Vec<_>>(), vec![3]);

        let q = LiteratureQuery { search: "interface".into(), ..Default::default() };
        assert_eq!(q.apply(&items, 2023)[0].id, 2);
    }

    #[test]
    fn test_literature_filters() {
        let items = library();
        let ids = |q: &LiteratureQuery| q.apply(&items, 2023).iter().map(|i| i.id).collect::<Vec<_>>();

        assert_eq!(ids(&LiteratureQuery::default()), vec![1, 2, 3]);
        assert_eq!(ids(&LiteratureQuery { filter: LiteratureFilter::Saved, ..Default::default() }), vec![1, 2]);
        assert_eq!(ids(&LiteratureQuery { filter: LiteratureFilter::Recent, ..Default::default() }), vec![1, 2]);
        assert_eq!(
            ids(&LiteratureQuery { filter: LiteratureFilter::Status(LiteratureStatus::ToRead), ..Default::default() }),
            vec![3]
        );
        assert_eq!(ids(&LiteratureQuery { category: Some("policy".into()), ..Default::default() }), vec![3]);
        // Category is exact, not substring.
        assert!(ids(&LiteratureQuery { category: Some("pol".into()), ..Default::default() }).is_empty());
    }

    #[test]
    fn test_literature_sorted_by_year_stable() {
        let mut items = library();
        items[1].year = 2024;
        let q = LiteratureQuery::default();
        let ids: Vec<u64> = q.apply(&items, 2023).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_predicates_commute() {
        let tasks = sample_tasks();
        let by_phase = TaskQuery { phase: Some(Phase::I), ..Default::default() };
        let by_priority = TaskQuery { priority: Some(Priority::High), ..Default::default() };
        let combined = TaskQuery { phase: Some(Phase::I), priority: Some(Priority::High), ..Default::default() };

        let a: Vec<u64> = tasks.iter().filter(|t| by_phase.matches(t) && by_priority.matches(t)).map(|t| t.id).collect();
        let b: Vec<u64> = tasks.iter().filter(|t| by_priority.matches(t) && by_phase.matches(t)).map(|t| t.id).collect();
        let c: Vec<u64> = combined.apply(&tasks).iter().map(|t| t.id).collect();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(c, vec![1, 2]);
    }

    #[test]
    fn test_literature_predicates_commute() {
        let items = library();
        let by_search = LiteratureQuery { search: "battery".into(), ..Default::default() };
        let by_filter = LiteratureQuery { filter: LiteratureFilter::Saved, ..Default::default() };
        let by_category = LiteratureQuery { category: Some("Materials".into()), ..Default::default() };
        let combined = LiteratureQuery {
            search: "battery".into(),
            filter: LiteratureFilter::Saved,
            category: Some("Materials".into()),
        };

        let ids = |order: [&LiteratureQuery; 3]| -> Vec<u64> {
            items
                .iter()
                .filter(|i| order.iter().all(|q| q.matches(i, 2023)))
                .map(|i| i.id)
                .collect()
        };
        let forward = ids([&by_search, &by_filter, &by_category]);
        assert_eq!(forward, ids([&by_category, &by_filter, &by_search]));
        assert_eq!(forward, ids([&by_filter, &by_search, &by_category]));

        let applied: Vec<u64> = combined.apply(&items, 2023).iter().map(|i| i.id).collect();
        assert_eq!(forward, applied);
        assert_eq!(applied, vec![2]);

        // Dropping the category widens to both saved matches, in either order.
        let two = |a: &LiteratureQuery, b: &LiteratureQuery| -> Vec<u64> {
            items.iter().filter(|i| a.matches(i, 2023) && b.matches(i, 2023)).map(|i| i.id).collect()
        };
        assert_eq!(two(&by_search, &by_filter), vec![1, 2]);
        assert_eq!(two(&by_filter, &by_search), vec![1, 2]);
    }

    #[test]
    fn test_task_filter_expressions() {
        let q: TaskQuery = "phase:ii status:not_started".parse().unwrap();
        assert_eq!(q.phase, Some(Phase::II));
        assert_eq!(q.status, Some(TaskStatus::NotStarted));
        assert_eq!(q.apply(&sample_tasks()).len(), 1);

        let mut q = q;
        q.apply_filter_expr("all").unwrap();
        assert_eq!(q, TaskQuery::default());

        assert!("phase".parse::<TaskQuery>().is_err());
        assert!("owner:me".parse::<TaskQuery>().is_err());
        assert!("status:done".parse::<TaskQuery>().is_err());
    }

    #[test]
    fn test_board_and_timeline() {
        let mut tasks = sample_tasks();
        tasks.swap(0, 2);
        let cols = board(&tasks);
        assert_eq!(cols.len(), 5);
        assert_eq!(cols[0].1.len(), 2);
        assert_eq!(cols[1].1.len(), 1);
        assert!(cols[4].1.is_empty());

        let ids: Vec<u64> = timeline(&tasks).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_board_columns_hide_empty_phases() {
        let tasks = sample_tasks();
        let phases: Vec<Phase> = board_columns(&tasks, None).iter().map(|(p, _)| *p).collect();
        assert_eq!(phases, vec![Phase::I, Phase::II]);

        let phases: Vec<Phase> = board_columns(&tasks, Some(Phase::IV)).iter().map(|(p, _)| *p).collect();
        assert_eq!(phases, vec![Phase::I, Phase::II, Phase::IV]);

        let only_ii = TaskQuery { phase: Some(Phase::II), ..Default::default() }.apply(&tasks);
        let only_ii: Vec<Task> = only_ii.into_iter().cloned().collect();
        let columns = board_columns(&only_ii, Some(Phase::II));
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].0, Phase::II);
        assert_eq!(columns[0].1.len(), 1);
    }

    #[test]
    fn test_paginate_bounds() {
        let items: Vec<u32> = (1..=25).collect();
        let p = paginate(&items, 3, 12);
        assert_eq!(p.items, vec![25]);
        assert_eq!((p.page, p.total_pages, p.total_items), (3, 3, 25));
        assert_eq!(p.shown_range(12), Some((25, 25)));

        // Out of range pages clamp.
        assert_eq!(paginate(&items, 0, 12).page, 1);
        assert_eq!(paginate(&items, 99, 12).page, 3);

        for page in 0..6 {
            for size in 1..30 {
                let p = paginate(&items, page, size);
                assert!(p.items.len() <= size);
                assert!(p.items.len() <= items.len());
            }
        }
    }

    #[test]
    fn test_paginate_empty() {
        let p = paginate::<u32>(&[], 4, 12);
        assert!(p.items.is_empty());
        assert_eq!((p.page, p.total_pages), (1, 0));
        assert_eq!(p.shown_range(12), None);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 3, 5), 1..=3);
        assert_eq!(page_window(1, 10, 5), 1..=5);
        assert_eq!(page_window(6, 10, 5), 4..=8);
        assert_eq!(page_window(10, 10, 5), 6..=10);
        assert!(page_window(1, 0, 5).is_empty());
    }
}
