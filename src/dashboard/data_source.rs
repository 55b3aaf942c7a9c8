use crate::dashboard::data::{ListItem, SeriesPoint, StatsData, WidgetData, WidgetPayload};
use crate::dashboard::model::WidgetConfig;
use crate::dashboard::renderer::WidgetFamily;
use rand::Rng;
use std::time::Duration;

/// Supplies data for one widget. Called once per widget per fetch cycle on a
/// worker thread, so implementations may block.
pub trait WidgetDataSource: Send + Sync {
    fn fetch(&self, widget: &WidgetConfig) -> Result<WidgetData, String>;
}

impl<F> WidgetDataSource for F
where
    F: Fn(&WidgetConfig) -> Result<WidgetData, String> + Send + Sync,
{
    fn fetch(&self, widget: &WidgetConfig) -> Result<WidgetData, String> {
        self(widget)
    }
}

const MONTHS: [&str; 7] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul"];
const CHANNELS: [&str; 4] = ["Direct", "Organic", "Referral", "Social"];

/// Synthetic data shaped after each widget type.
#[derive(Debug, Clone)]
pub struct SimulatedDataSource {
    latency: Duration,
    failure_rate: f64,
}

impl Default for SimulatedDataSource {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(400),
            failure_rate: 0.0,
        }
    }
}

impl SimulatedDataSource {
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO, 0.0)
    }

    fn stats(rng: &mut impl Rng) -> WidgetPayload {
        let value: f64 = rng.gen_range(500.0..120_000.0);
        let change: f64 = rng.gen_range(-25.0..25.0);
        WidgetPayload::Stats(StatsData {
            value: value.round(),
            change: (change * 10.0).round() / 10.0,
            label: None,
        })
    }

    fn series(widget: &WidgetConfig, rng: &mut impl Rng) -> WidgetPayload {
        let data_key = widget.config_str("dataKey").unwrap_or("value").to_string();
        let labels: &[&str] = match widget.config_str("chartType") {
            Some("pie") | Some("doughnut") => &CHANNELS,
            _ => &MONTHS,
        };
        let points = labels
            .iter()
            .map(|label| {
                let v = rng.gen_range(100.0..5_000.0_f64).round();
                let mut point = SeriesPoint::new(*label).with("value", v);
                if data_key != "value" {
                    point = point.with(&data_key, v);
                }
                point
            })
            .collect();
        WidgetPayload::Series { points }
    }

    fn items(widget: &WidgetConfig, rng: &mut impl Rng) -> WidgetPayload {
        let activity = widget.widget_type.as_str() == "recent-activity";
        let items = (0..5)
            .map(|i| {
                let minutes = rng.gen_range(1..59);
                if activity {
                    ListItem {
                        id: format!("activity-{i}"),
                        title: ["User signed up", "Order placed", "Report exported", "Invoice paid", "Plan upgraded"][i].into(),
                        subtitle: Some(format!("user{}@example.com", rng.gen_range(10..99))),
                        status: None,
                        timestamp: Some(format!("{minutes}m ago")),
                    }
                } else {
                    let status = ["completed", "pending", "processing", "completed", "failed"][i];
                    ListItem {
                        id: format!("order-{}", 1040 + i),
                        title: format!("Order #{}", 1040 + i),
                        subtitle: Some(format!("${:.2}", rng.gen_range(20.0..900.0_f64))),
                        status: Some(status.into()),
                        timestamp: Some(format!("{minutes}m ago")),
                    }
                }
            })
            .collect();
        WidgetPayload::Items { items }
    }
}

impl WidgetDataSource for SimulatedDataSource {
    fn fetch(&self, widget: &WidgetConfig) -> Result<WidgetData, String> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        let mut rng = rand::thread_rng();
        if self.failure_rate > 0.0 && rng.gen_bool(self.failure_rate) {
            return Err(format!("Failed to load data for '{}'", widget.title));
        }
        let payload = match widget.widget_type.family() {
            WidgetFamily::Stats => Self::stats(&mut rng),
            WidgetFamily::Chart => Self::series(widget, &mut rng),
            WidgetFamily::List => Self::items(widget, &mut rng),
            WidgetFamily::NotImplemented | WidgetFamily::Unsupported => {
                return Ok(WidgetData::default())
            }
        };
        Ok(WidgetData::payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::WidgetType;
    use serde_json::json;

    #[test]
    fn payload_matches_widget_type() {
        let source = SimulatedDataSource::instant();
        let stats = source
            .fetch(&WidgetConfig::new("a", WidgetType::Metric, "A"))
            .unwrap();
        assert!(matches!(stats.payload, Some(WidgetPayload::Stats(_))));

        let mut chart = WidgetConfig::new("b", WidgetType::Chart, "B");
        chart.config = json!({"dataKey": "revenue"});
        let series = source.fetch(&chart).unwrap();
        let Some(WidgetPayload::Series { points }) = series.payload else {
            panic!("expected series");
        };
        assert_eq!(points.len(), MONTHS.len());
        assert!(points[0].values.contains_key("revenue"));

        let list = source
            .fetch(&WidgetConfig::new("c", WidgetType::RecentActivity, "C"))
            .unwrap();
        assert!(matches!(list.payload, Some(WidgetPayload::Items { ref items }) if items.len() == 5));
    }

    #[test]
    fn always_failing_source_errors() {
        let source = SimulatedDataSource::new(Duration::ZERO, 1.0);
        let err = source
            .fetch(&WidgetConfig::new("a", WidgetType::Stats, "Revenue"))
            .unwrap_err();
        assert!(err.contains("Revenue"));
    }

    #[test]
    fn closures_are_sources() {
        let source = |_: &WidgetConfig| -> Result<WidgetData, String> { Err("nope".into()) };
        assert!(source
            .fetch(&WidgetConfig::new("a", WidgetType::Stats, "A"))
            .is_err());
    }
}
