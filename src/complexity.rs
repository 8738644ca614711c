//! Heuristic complexity score for DAX expressions.
//!
//! This is a rough proxy, not a parser: it counts characters, upper-case
//! identifiers directly followed by `(`, and opening parentheses.

const LENGTH_CAP: f64 = 500.0;
const FUNCTION_CAP: f64 = 10.0;
const NESTING_CAP: f64 = 5.0;

const LENGTH_WEIGHT: f64 = 0.3;
const FUNCTION_WEIGHT: f64 = 0.4;
const NESTING_WEIGHT: f64 = 0.3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComplexityScore {
	pub total: u32,
	pub length: u32,
	pub functions: u32,
	pub nesting: u32,
}

impl ComplexityScore {
	pub fn of(expression: &str) -> Self {
		// UTF-16 units, matching the length the browser reports for the text
		let length = expression.encode_utf16().count() as f64;
		let functions = count_function_calls(expression) as f64;
		let nesting = expression.matches('(').count() as f64;

		let length = (length / LENGTH_CAP).min(1.0) * LENGTH_WEIGHT;
		let functions = (functions / FUNCTION_CAP).min(1.0) * FUNCTION_WEIGHT;
		let nesting = (nesting / NESTING_CAP).min(1.0) * NESTING_WEIGHT;

		Self {
			total: percent(length + functions + nesting),
			length: percent(length),
			functions: percent(functions),
			nesting: percent(nesting),
		}
	}

	pub fn tier(&self) -> Tier {
		Tier::for_score(self.total)
	}
}

fn percent(fraction: f64) -> u32 {
	(fraction * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Non-overlapping runs of `A`..=`Z` immediately followed by `(`.
fn count_function_calls(expression: &str) -> usize {
	let mut count = 0;
	let mut run = 0usize;
	for c in expression.chars() {
		if c.is_ascii_uppercase() {
			run += 1;
			continue;
		}
		if c == '(' && run > 0 {
			count += 1;
		}
		run = 0;
	}
	count
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
	Low,
	Moderate,
	High,
	Critical,
}

impl Tier {
	pub fn for_score(score: u32) -> Self {
		match score {
			s if s > 80 => Tier::Critical,
			s if s > 60 => Tier::High,
			s if s > 40 => Tier::Moderate,
			_ => Tier::Low,
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			Tier::Critical => "#ef4444",
			Tier::High => "#f97316",
			Tier::Moderate => "#eab308",
			Tier::Low => "#22c55e",
		}
	}
}

/// Turn literal `\n`, `\t` and `\r` sequences into the characters they name.
pub fn unescape_expression(raw: &str) -> String {
	raw.replace("\\n", "\n")
		.replace("\\t", "\t")
		.replace("\\r", "\r")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_expression_scores_zero() {
		assert_eq!(ComplexityScore::of(""), ComplexityScore::default());
		assert_eq!(ComplexityScore::of("").tier(), Tier::Low);
	}

	#[test]
	fn simple_measure() {
		// 27 chars, one call, one paren
		let score = ComplexityScore::of("SUM(Sales[Amount]) + 0 * 1 ");
		assert_eq!(score.functions, 4);
		assert_eq!(score.nesting, 6);
		assert_eq!(score.length, 2);
		assert_eq!(score.total, 12);
	}

	#[test]
	fn pathological_input_clamps_at_one_hundred() {
		let expr = "A(".repeat(5_000);
		let score = ComplexityScore::of(&expr);
		assert_eq!(score.length, 30);
		assert_eq!(score.functions, 40);
		assert_eq!(score.nesting, 30);
		assert_eq!(score.total, 100);
		assert_eq!(score.tier(), Tier::Critical);
	}

	#[test]
	fn lowercase_calls_are_not_functions() {
		let score = ComplexityScore::of("sum(x)");
		assert_eq!(score.functions, 0);
		assert_eq!(score.nesting, 6);
	}

	#[test]
	fn mixed_case_identifier_counts_its_uppercase_tail() {
		// `[A-Z]+\(` matches the trailing `X(` in `maX(`
		assert_eq!(count_function_calls("maX(1)"), 1);
		assert_eq!(count_function_calls("CALCULATE(SUM(x), FILTER(t, 1))"), 3);
		assert_eq!(count_function_calls("IF ( x )"), 0);
	}

	#[test]
	fn tiers_use_strict_thresholds() {
		assert_eq!(Tier::for_score(81), Tier::Critical);
		assert_eq!(Tier::for_score(80), Tier::High);
		assert_eq!(Tier::for_score(61), Tier::High);
		assert_eq!(Tier::for_score(60), Tier::Moderate);
		assert_eq!(Tier::for_score(41), Tier::Moderate);
		assert_eq!(Tier::for_score(40), Tier::Low);
		assert_eq!(Tier::Critical.color(), "#ef4444");
	}

	#[test]
	fn totals_stay_in_range_for_any_length() {
		for n in [0, 1, 10, 499, 500, 501, 10_000] {
			let score = ComplexityScore::of(&"(".repeat(n));
			assert!(score.total <= 100);
		}
	}

	#[test]
	fn unescapes_literal_sequences() {
		assert_eq!(unescape_expression("a\\nb\\tc\\r"), "a\nb\tc\r");
	}
}
