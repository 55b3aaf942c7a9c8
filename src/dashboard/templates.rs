use crate::dashboard::model::WidgetType;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateCategory {
    Sales,
    Users,
    Analytics,
    General,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 4] = [
        TemplateCategory::Sales,
        TemplateCategory::Users,
        TemplateCategory::Analytics,
        TemplateCategory::General,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TemplateCategory::Sales => "Sales",
            TemplateCategory::Users => "Users",
            TemplateCategory::Analytics => "Analytics",
            TemplateCategory::General => "General",
        }
    }
}

/// Catalogue preset used to create a widget.
#[derive(Debug, Clone, Copy)]
pub struct WidgetTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub widget_type: &'static str,
    pub category: TemplateCategory,
    default_config: fn() -> Value,
}

impl WidgetTemplate {
    pub fn widget_type(&self) -> WidgetType {
        WidgetType::from(self.widget_type)
    }

    pub fn default_config(&self) -> Value {
        (self.default_config)()
    }
}

static CATALOGUE: [WidgetTemplate; 8] = [
    WidgetTemplate {
        key: "sales-stats",
        name: "Total Revenue",
        description: "Revenue this month with change against last month",
        widget_type: "stats",
        category: TemplateCategory::Sales,
        default_config: || json!({ "dataKey": "revenue", "prefix": "$" }),
    },
    WidgetTemplate {
        key: "users-count",
        name: "Active Users",
        description: "Users active in the last 30 days",
        widget_type: "stats",
        category: TemplateCategory::Users,
        default_config: || json!({ "dataKey": "users" }),
    },
    WidgetTemplate {
        key: "conversion-rate",
        name: "Conversion Rate",
        description: "Share of visits that turned into orders",
        widget_type: "metric",
        category: TemplateCategory::Analytics,
        default_config: || json!({ "dataKey": "conversion", "suffix": "%" }),
    },
    WidgetTemplate {
        key: "sales-chart",
        name: "Sales Overview",
        description: "Monthly revenue trend",
        widget_type: "chart",
        category: TemplateCategory::Sales,
        default_config: || json!({ "chartType": "area", "dataKey": "revenue", "aggregation": "sum" }),
    },
    WidgetTemplate {
        key: "traffic-bar",
        name: "Traffic by Month",
        description: "Visits per month",
        widget_type: "chart",
        category: TemplateCategory::Analytics,
        default_config: || json!({ "chartType": "bar", "dataKey": "visits", "aggregation": "sum" }),
    },
    WidgetTemplate {
        key: "performance-pie",
        name: "Traffic Sources",
        description: "Where visitors come from",
        widget_type: "chart",
        category: TemplateCategory::Analytics,
        default_config: || json!({ "chartType": "pie", "dataKey": "value" }),
    },
    WidgetTemplate {
        key: "recent-orders",
        name: "Recent Orders",
        description: "Latest orders and their status",
        widget_type: "list",
        category: TemplateCategory::Sales,
        default_config: || json!({ "limit": 5 }),
    },
    WidgetTemplate {
        key: "activity-feed",
        name: "Activity Feed",
        description: "Latest account activity",
        widget_type: "recent-activity",
        category: TemplateCategory::General,
        default_config: || json!({ "limit": 5 }),
    },
];

/// The full preset catalogue.
pub fn catalogue() -> &'static [WidgetTemplate] {
    &CATALOGUE
}

pub fn template(key: &str) -> Option<&'static WidgetTemplate> {
    CATALOGUE.iter().find(|t| t.key == key)
}

/// Catalogue entries in `category`, or all of them for `None`.
pub fn filter_templates(category: Option<TemplateCategory>) -> Vec<&'static WidgetTemplate> {
    CATALOGUE
        .iter()
        .filter(|t| category.map_or(true, |c| t.category == c))
        .collect()
}
