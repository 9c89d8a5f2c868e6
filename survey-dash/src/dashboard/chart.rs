//! Generic labeled-series → chart description
//!
//! Every chart on the dashboard goes through [`ChartSpec::from_series`]; the
//! page script decides how to draw each [`ChartKind`].

use serde::Serialize;

/// Single-series accent color
const PRIMARY_COLOR: &str = "#2ca02c";

/// D3 category10, for charts with many categories
const QUALITATIVE_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Pie,
    Funnel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    Primary,
    Qualitative,
}

impl Palette {
    pub fn colors(&self) -> &'static [&'static str] {
        match self {
            Palette::Primary => &[PRIMARY_COLOR],
            Palette::Qualitative => &QUALITATIVE_COLORS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
}

/// Presentation-agnostic chart description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub palette: Palette,
    pub colors: &'static [&'static str],
    pub label_axis: String,
    pub value_axis: String,
    /// Print the value next to each bar/slice
    pub show_values: bool,
    pub points: Vec<ChartPoint>,
}

impl ChartSpec {
    /// Build a chart from `(label, value)` pairs, keeping their order
    pub fn from_series<L, I>(title: &str, kind: ChartKind, palette: Palette, series: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, u64)>,
    {
        Self {
            title: title.to_string(),
            kind,
            palette,
            colors: palette.colors(),
            label_axis: "Answer".to_string(),
            value_axis: "Responses".to_string(),
            show_values: true,
            points: series
                .into_iter()
                .map(|(label, value)| ChartPoint {
                    label: label.into(),
                    value,
                })
                .collect(),
        }
    }

    pub fn with_axes(mut self, label_axis: &str, value_axis: &str) -> Self {
        self.label_axis = label_axis.to_string();
        self.value_axis = value_axis.to_string();
        self
    }

    pub fn without_values(mut self) -> Self {
        self.show_values = false;
        self
    }

    pub fn total(&self) -> u64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_series_keeps_order() {
        let chart = ChartSpec::from_series(
            "Responses by University",
            ChartKind::Bar,
            Palette::Primary,
            vec![("UNEB", 5u64), ("UFBA", 7u64)],
        );
        let labels: Vec<&str> = chart.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["UNEB", "UFBA"]);
        assert_eq!(chart.total(), 12);
        assert_eq!(chart.colors, &["#2ca02c"]);
    }

    #[test]
    fn test_serialized_shape() {
        let chart = ChartSpec::from_series(
            "Course",
            ChartKind::HorizontalBar,
            Palette::Qualitative,
            vec![("Letras".to_string(), 3u64)],
        )
        .with_axes("Course", "Responses")
        .without_values();

        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["kind"], "horizontal_bar");
        assert_eq!(json["palette"], "qualitative");
        assert_eq!(json["colors"].as_array().unwrap().len(), 10);
        assert_eq!(json["show_values"], false);
        assert_eq!(json["points"][0]["label"], "Letras");
        assert_eq!(json["points"][0]["value"], 3);
    }
}
