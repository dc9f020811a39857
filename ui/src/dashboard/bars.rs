//! Horizontal bar lists drawn with plain CSS widths.

use dioxus::prelude::*;

use crate::core::stats::Bin;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub display: String,
    /// Share of the largest bar, 0..=100.
    pub width_pct: f64,
}

/// Scale values against the largest one. Negative values draw as empty bars.
pub fn scale_bars<I>(items: I, display: impl Fn(f64) -> String) -> Vec<Bar>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let items: Vec<(String, f64)> = items.into_iter().collect();
    let max = items
        .iter()
        .map(|(_, value)| *value)
        .filter(|value| value.is_finite())
        .fold(0.0_f64, f64::max);
    items
        .into_iter()
        .map(|(label, value)| Bar {
            width_pct: if max > 0.0 && value.is_finite() {
                (value / max * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            },
            display: display(value),
            label,
        })
        .collect()
}

pub fn count_bars<I>(items: I) -> Vec<Bar>
where
    I: IntoIterator<Item = (String, usize)>,
{
    scale_bars(
        items.into_iter().map(|(label, count)| (label, count as f64)),
        |value| format!("{value:.0}"),
    )
}

pub fn histogram_bars(bins: &[Bin], unit: &str) -> Vec<Bar> {
    count_bars(bins.iter().map(|bin| {
        (
            format!("{:.0}{unit} … {:.0}{unit}", bin.start, bin.end),
            bin.count,
        )
    }))
}

#[component]
pub fn BarList(bars: Vec<Bar>, #[props(default)] compact: bool) -> Element {
    let class = if compact {
        "bar-list bar-list--compact"
    } else {
        "bar-list"
    };
    rsx! {
        ul { class: "{class}",
            for (idx, bar) in bars.iter().enumerate() {
                li { class: "bar-list__row", key: "{idx}",
                    span { class: "bar-list__label", title: "{bar.label}", "{bar.label}" }
                    span { class: "bar-list__track",
                        span {
                            class: "bar-list__fill",
                            style: "width: {bar.width_pct:.1}%",
                        }
                    }
                    span { class: "bar-list__value", "{bar.display}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_are_relative_to_the_largest_value() {
        let bars = count_bars(vec![("a".into(), 4), ("b".into(), 2), ("c".into(), 0)]);
        let widths: Vec<f64> = bars.iter().map(|b| b.width_pct).collect();
        assert_eq!(widths, vec![100.0, 50.0, 0.0]);
        assert_eq!(bars[1].display, "2");
    }

    #[test]
    fn all_zero_or_negative_values_draw_empty() {
        let bars = scale_bars(vec![("a".into(), 0.0), ("b".into(), -3.0)], |v| v.to_string());
        assert!(bars.iter().all(|b| b.width_pct == 0.0));
    }

    #[test]
    fn histogram_labels_show_bin_edges() {
        let bins = [Bin {
            start: -2.0,
            end: 3.0,
            count: 5,
        }];
        let bars = histogram_bars(&bins, "d");
        assert_eq!(bars[0].label, "-2d … 3d");
        assert_eq!(bars[0].width_pct, 100.0);
    }
}
