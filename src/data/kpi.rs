//! Headline metrics for the filtered view

use super::selection::Constituent;
use crate::constants::data::BILLION;

/// Shown when a metric cannot be computed (empty view, all values missing)
pub const NOT_AVAILABLE: &str = "N/A";

/// Best year-to-date performer
#[derive(Debug, Clone, PartialEq)]
pub struct TopPerformer {
    pub ticker: String,
    pub ytd_return: f64,
}

/// The four KPI cards
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kpis {
    /// Mean y25td_Return, skipping missing values
    pub avg_return: Option<f64>,
    /// Mean PE_Ratio, skipping missing values
    pub avg_pe: Option<f64>,
    /// Highest y25td_Return; the first row wins ties
    pub top_performer: Option<TopPerformer>,
    /// Sum of Market_Cap in billions
    pub total_market_cap_billions: f64,
}

fn finite_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

impl Kpis {
    pub fn compute(rows: &[Constituent]) -> Self {
        profiling::scope!("compute_kpis");

        let top_performer = rows
            .iter()
            .filter(|r| r.ytd_return.is_finite())
            .fold(None::<&Constituent>, |best, r| match best {
                Some(b) if b.ytd_return >= r.ytd_return => Some(b),
                _ => Some(r),
            })
            .map(|r| TopPerformer {
                ticker: r.ticker.clone(),
                ytd_return: r.ytd_return,
            });

        let total: f64 = rows
            .iter()
            .map(|r| r.market_cap)
            .filter(|v| v.is_finite())
            .sum();

        Self {
            avg_return: finite_mean(rows.iter().map(|r| r.ytd_return)),
            avg_pe: finite_mean(rows.iter().map(|r| r.pe_ratio)),
            top_performer,
            total_market_cap_billions: total / BILLION,
        }
    }

    pub fn avg_return_label(&self) -> String {
        self.avg_return
            .map(|v| format!("{:.2}%", v))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn avg_pe_label(&self) -> String {
        self.avg_pe
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// (ticker, delta) for the top performer card
    pub fn top_performer_label(&self) -> (String, Option<String>) {
        match &self.top_performer {
            Some(top) => (top.ticker.clone(), Some(format!("{:.2}%", top.ytd_return))),
            None => (NOT_AVAILABLE.to_string(), None),
        }
    }

    pub fn total_market_cap_label(&self) -> String {
        format!("${} B", group_thousands(self.total_market_cap_billions))
    }
}

/// Round to a whole number and insert comma separators
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::selection::constituent;

    #[test]
    fn test_kpis() {
        let rows = vec![
            constituent("AAPL", "Tech", "Hardware", 3.5e12, 30.0, 10.0),
            constituent("MSFT", "Tech", "Software", 3.0e12, 40.0, 20.0),
            constituent("INTC", "Tech", "Semis", 1.0e11, f64::NAN, -30.0),
        ];
        let kpis = Kpis::compute(&rows);

        assert_eq!(kpis.avg_return, Some(0.0));
        assert_eq!(kpis.avg_pe, Some(35.0));
        assert_eq!(kpis.top_performer.as_ref().unwrap().ticker, "MSFT");
        assert_eq!(kpis.total_market_cap_billions, 6600.0);

        assert_eq!(kpis.avg_return_label(), "0.00%");
        assert_eq!(kpis.avg_pe_label(), "35.00");
        assert_eq!(
            kpis.top_performer_label(),
            ("MSFT".to_string(), Some("20.00%".to_string()))
        );
        assert_eq!(kpis.total_market_cap_label(), "$6,600 B");
    }

    #[test]
    fn test_top_performer_first_wins_ties() {
        let rows = vec![
            constituent("AAA", "S", "I", 1.0, 1.0, 5.0),
            constituent("BBB", "S", "I", 1.0, 1.0, 5.0),
        ];
        let kpis = Kpis::compute(&rows);
        assert_eq!(kpis.top_performer.unwrap().ticker, "AAA");
    }

    #[test]
    fn test_empty_view() {
        let kpis = Kpis::compute(&[]);

        assert_eq!(kpis.avg_return_label(), NOT_AVAILABLE);
        assert_eq!(kpis.avg_pe_label(), NOT_AVAILABLE);
        assert_eq!(kpis.top_performer_label(), (NOT_AVAILABLE.to_string(), None));
        assert_eq!(kpis.total_market_cap_label(), "$0 B");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.4), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(52_345_678.6), "52,345,679");
        assert_eq!(group_thousands(-1234.0), "-1,234");
    }
}
