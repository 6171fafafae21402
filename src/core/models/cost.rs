use serde::{Deserialize, Serialize};

/// Service name used when the billing API returns a group without keys.
pub const UNKNOWN_SERVICE: &str = "N/A";

/// One service's charge within one period. Amount and unit are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCost {
    pub service_name: String,
    pub amount: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostByTime {
    pub start: String,
    pub end: String,
    pub service_costs: Vec<ServiceCost>,
}

/// Per-period breakdowns in the order the billing API returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    pub periods: Vec<CostByTime>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_as_plain_array() {
        let report = Report {
            periods: vec![CostByTime {
                start: "2024-01-01".into(),
                end: "2024-02-01".into(),
                service_costs: vec![ServiceCost {
                    service_name: "AWS Lambda".into(),
                    amount: "0.0000001".into(),
                    unit: "USD".into(),
                }],
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["service_costs"][0]["amount"], "0.0000001");
    }

    #[test]
    fn default_report_is_empty() {
        let report = Report::default();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
    }
}
