//! Search, sort and column visibility for the visuals table.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Deserialize;

/// Table contents as embedded by the server.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TableData {
	#[serde(default)]
	pub headers: Vec<String>,
	#[serde(default)]
	pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortState {
	pub column: usize,
	pub ascending: bool,
}

/// View state of one table. Row visibility and order are derived on demand,
/// so a sort never drops the active search and vice versa.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableState {
	data: TableData,
	/// Row indices in display order.
	order: Vec<usize>,
	visible_columns: BTreeSet<usize>,
	search: String,
	sort: Option<SortState>,
	selector_open: bool,
}

impl TableState {
	pub fn new(data: TableData) -> Self {
		let width = data
			.rows
			.iter()
			.map(Vec::len)
			.chain(std::iter::once(data.headers.len()))
			.max()
			.unwrap_or(0);
		Self {
			order: (0..data.rows.len()).collect(),
			visible_columns: (0..width).collect(),
			data,
			..Default::default()
		}
	}

	pub fn headers(&self) -> &[String] {
		&self.data.headers
	}

	pub fn row(&self, index: usize) -> &[String] {
		&self.data.rows[index]
	}

	pub fn search(&self) -> &str {
		&self.search
	}

	pub fn set_search(&mut self, term: &str) {
		self.search = term.to_lowercase();
	}

	pub fn sort_state(&self) -> Option<SortState> {
		self.sort
	}

	pub fn is_column_visible(&self, column: usize) -> bool {
		self.visible_columns.contains(&column)
	}

	pub fn visible_columns(&self) -> impl Iterator<Item = usize> + '_ {
		self.visible_columns.iter().copied()
	}

	pub fn toggle_column(&mut self, column: usize) {
		if !self.visible_columns.remove(&column) {
			self.visible_columns.insert(column);
		}
	}

	pub fn selector_open(&self) -> bool {
		self.selector_open
	}

	pub fn toggle_selector(&mut self) {
		self.selector_open = !self.selector_open;
	}

	/// Whether the row's visible-column text contains the search term.
	pub fn matches(&self, index: usize) -> bool {
		if self.search.is_empty() {
			return true;
		}
		let text = self.data.rows[index]
			.iter()
			.enumerate()
			.filter(|(i, _)| self.visible_columns.contains(i))
			.map(|(_, cell)| cell.to_lowercase())
			.collect::<Vec<_>>()
			.join(" ");
		text.contains(&self.search)
	}

	/// Rows that pass the search filter, in display order.
	pub fn visible_rows(&self) -> Vec<usize> {
		self.order
			.iter()
			.copied()
			.filter(|&i| self.matches(i))
			.collect()
	}

	/// Sort by `column`; repeating the last column flips the direction.
	pub fn sort_by(&mut self, column: usize) {
		let ascending = match self.sort {
			Some(s) if s.column == column => !s.ascending,
			_ => true,
		};
		self.sort = Some(SortState { column, ascending });

		let rows = &self.data.rows;
		// rows missing the cell go last
		self.order.sort_by(|&a, &b| {
			let ord = match (rows[a].get(column), rows[b].get(column)) {
				(Some(a), Some(b)) => compare_cells(a.trim(), b.trim()),
				(Some(_), None) => Ordering::Less,
				(None, Some(_)) => Ordering::Greater,
				(None, None) => Ordering::Equal,
			};
			if ascending { ord } else { ord.reverse() }
		});
		log::debug!(
			"sorted column {column} {}",
			if ascending { "ascending" } else { "descending" }
		);
	}

	/// `fa-sort-up`, `fa-sort-down` or `fa-sort` for a header icon.
	pub fn sort_icon(&self, column: usize) -> &'static str {
		match self.sort {
			Some(SortState { column: c, ascending: true }) if c == column => "fas fa-sort-up",
			Some(SortState { column: c, ascending: false }) if c == column => "fas fa-sort-down",
			_ => "fas fa-sort",
		}
	}

	/// Headers and cells of what is currently on screen.
	pub fn visible_grid(&self) -> (Vec<&str>, Vec<Vec<&str>>) {
		let headers = self
			.visible_columns()
			.filter_map(|c| self.data.headers.get(c).map(String::as_str))
			.collect();
		let rows = self
			.visible_rows()
			.into_iter()
			.map(|r| {
				self.visible_columns()
					.filter_map(|c| self.data.rows[r].get(c).map(String::as_str))
					.collect()
			})
			.collect();
		(headers, rows)
	}
}

fn parse_number(cell: &str) -> Option<f64> {
	cell.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Numbers sort before text; numbers compare by value, text by
/// [`compare_text`]. This is a total order, so mixed columns sort safely.
pub fn compare_cells(a: &str, b: &str) -> Ordering {
	match (parse_number(a), parse_number(b)) {
		(Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => compare_text(a, b),
	}
}

/// Case-insensitive ordering with the raw text as tie-break.
pub fn compare_text(a: &str, b: &str) -> Ordering {
	a.to_lowercase()
		.cmp(&b.to_lowercase())
		.then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table() -> TableState {
		TableState::new(TableData {
			headers: vec!["Page".into(), "Visual".into(), "Count".into()],
			rows: vec![
				vec!["Overview".into(), "Bar chart".into(), "10".into()],
				vec!["Details".into(), "Table".into(), "2".into()],
				vec!["Summary".into(), "card".into(), "33".into()],
				vec!["Appendix".into(), "Matrix".into(), "2.5".into()],
			],
		})
	}

	fn column(t: &TableState, c: usize) -> Vec<String> {
		t.visible_rows().iter().map(|&r| t.row(r)[c].clone()).collect()
	}

	#[test]
	fn all_columns_visible_by_default() {
		let t = table();
		assert_eq!(t.visible_columns().collect::<Vec<_>>(), vec![0, 1, 2]);
		assert_eq!(t.visible_rows(), vec![0, 1, 2, 3]);
	}

	#[test]
	fn search_is_case_insensitive_substring() {
		let mut t = table();
		t.set_search("TAB");
		assert_eq!(t.visible_rows(), vec![1]);
		t.set_search("");
		assert_eq!(t.visible_rows().len(), 4);
	}

	#[test]
	fn search_spans_the_joined_row_text() {
		let mut t = table();
		t.set_search("overview bar");
		assert_eq!(t.visible_rows(), vec![0]);
	}

	#[test]
	fn search_term_is_kept_lower_cased() {
		let mut t = table();
		t.set_search("OverView");
		assert_eq!(t.search(), "overview");
		assert_eq!(t.visible_rows(), vec![0]);
		t.set_search("nothing");
		assert!(t.visible_rows().is_empty());
	}

	#[test]
	fn hidden_columns_leave_the_match() {
		let mut t = table();
		t.set_search("matrix");
		assert_eq!(t.visible_rows(), vec![3]);
		t.toggle_column(1);
		assert!(!t.is_column_visible(1));
		assert!(t.visible_rows().is_empty());
		t.toggle_column(1);
		assert_eq!(t.visible_rows(), vec![3]);
	}

	#[test]
	fn numeric_columns_sort_numerically() {
		let mut t = table();
		t.sort_by(2);
		assert_eq!(column(&t, 2), vec!["2", "2.5", "10", "33"]);
		assert_eq!(t.sort_icon(2), "fas fa-sort-up");
		assert_eq!(t.sort_icon(0), "fas fa-sort");
	}

	#[test]
	fn repeat_sort_reverses_and_new_column_resets() {
		let mut t = table();
		t.sort_by(1);
		let asc = column(&t, 1);
		assert_eq!(asc, vec!["Bar chart", "card", "Matrix", "Table"]);
		t.sort_by(1);
		let mut desc = column(&t, 1);
		desc.reverse();
		assert_eq!(desc, asc);
		assert_eq!(t.sort_icon(1), "fas fa-sort-down");

		t.sort_by(0);
		assert_eq!(t.sort_state(), Some(SortState { column: 0, ascending: true }));
	}

	#[test]
	fn sorting_keeps_the_search_filter() {
		let mut t = table();
		t.set_search("2");
		assert_eq!(t.visible_rows(), vec![1, 3]);
		t.sort_by(2);
		t.sort_by(2);
		assert_eq!(column(&t, 2), vec!["2.5", "2"]);
	}

	#[test]
	fn numbers_sort_before_text() {
		assert_eq!(compare_cells("10", "9"), Ordering::Greater);
		assert_eq!(compare_cells("10", "1a"), Ordering::Less);
		assert_eq!(compare_cells("1a", "9"), Ordering::Greater);
		assert_eq!(compare_cells("10", "x"), Ordering::Less);
		assert_eq!(compare_cells("NaN", "1"), Ordering::Greater);
		assert_eq!(compare_cells("05", "5"), Ordering::Less);
		assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
		assert_eq!(compare_text("a", "A"), Ordering::Greater);
	}

	#[test]
	fn large_mixed_column_sorts_in_both_directions() {
		let cells = ["9", "10", "1a", "2", "x", "100", "1b", "05", "abc", "3.5", "20", "2z"];
		let rows: Vec<Vec<String>> = (0..600)
			.map(|i| vec![cells[(i * 7) % cells.len()].to_string()])
			.chain((0..40).map(|i| vec![format!("{i}")]))
			.chain(std::iter::once(vec![]))
			.collect();
		let mut t = TableState::new(TableData {
			headers: vec!["Mixed".into()],
			rows,
		});

		t.sort_by(0);
		let asc: Vec<String> = t
			.visible_rows()
			.into_iter()
			.map(|r| t.row(r).first().cloned().unwrap_or_default())
			.collect();
		assert_eq!(asc.len(), 641);
		assert_eq!(asc[0], "0");
		assert_eq!(asc[639], "x");
		// the ragged row goes last
		assert_eq!(asc[640], "");
		for pair in asc[..640].windows(2) {
			assert_ne!(compare_cells(&pair[0], &pair[1]), Ordering::Greater, "{pair:?}");
		}
		let first_text = asc.iter().position(|c| parse_number(c).is_none()).unwrap();
		assert!(asc[first_text..640].iter().all(|c| parse_number(c).is_none()));

		t.sort_by(0);
		let desc: Vec<String> = t
			.visible_rows()
			.into_iter()
			.map(|r| t.row(r).first().cloned().unwrap_or_default())
			.collect();
		assert_eq!(desc[0], "");
		assert_eq!(desc[1], "x");
		assert_eq!(desc[640], "0");
	}

	#[test]
	fn ragged_rows_do_not_panic() {
		let mut t = TableState::new(TableData {
			headers: vec!["A".into()],
			rows: vec![vec!["x".into(), "extra".into()], vec![]],
		});
		assert!(t.is_column_visible(1));
		t.sort_by(1);
		t.set_search("extra");
		assert_eq!(t.visible_rows(), vec![0]);
		let (headers, rows) = t.visible_grid();
		assert_eq!(headers, vec!["A"]);
		assert_eq!(rows, vec![vec!["x", "extra"]]);
	}

	#[test]
	fn visible_grid_follows_order_and_columns() {
		let mut t = table();
		t.toggle_column(1);
		t.sort_by(2);
		t.set_search("a");
		let (headers, rows) = t.visible_grid();
		assert_eq!(headers, vec!["Page", "Count"]);
		assert_eq!(rows, vec![vec!["Details", "2"], vec!["Appendix", "2.5"], vec!["Summary", "33"]]);
	}
}
