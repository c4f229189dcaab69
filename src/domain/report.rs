/// Output of a completed analysis: the generated markdown summary plus the
/// structured risk findings. Risk extraction is not wired up yet, so `risks`
/// is always empty; the record shape is kept so the API contract does not
/// change when it lands.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub summary_md: String,
    pub risks: Vec<Risk>,
}

impl AnalysisReport {
    pub fn summary_only(summary_md: String) -> Self {
        Self {
            summary_md,
            risks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Risk {
    pub title: String,
    pub severity: RiskSeverity,
    pub reason: String,
    pub page: u32,
    pub mitigation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
}

impl RiskSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskSeverity::Low => "low",
            RiskSeverity::Medium => "medium",
            RiskSeverity::High => "high",
        }
    }
}

impl std::fmt::Display for RiskSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
