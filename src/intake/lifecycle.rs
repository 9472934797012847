/// Intake status lifecycle
///
/// Search submissions move `processing -> completed`; found reports start
/// and stay `active`. The gap between the two search stages is where
/// asynchronous work such as matching would run.
use crate::reports::{ReportKind, ReportStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStage {
    Processing,
    Completed,
    Active,
}

impl IntakeStage {
    /// Stage a freshly inserted record starts in
    pub fn initial(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Search => IntakeStage::Processing,
            ReportKind::Found => IntakeStage::Active,
        }
    }

    /// Next stage reached within the intake flow, if any
    pub fn next(self) -> Option<Self> {
        match self {
            IntakeStage::Processing => Some(IntakeStage::Completed),
            IntakeStage::Completed | IntakeStage::Active => None,
        }
    }

    pub fn status(self) -> ReportStatus {
        match self {
            IntakeStage::Processing => ReportStatus::processing(),
            IntakeStage::Completed => ReportStatus::completed(),
            IntakeStage::Active => ReportStatus::active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_lifecycle() {
        let stage = IntakeStage::initial(ReportKind::Search);
        assert_eq!(stage.status().as_str(), "processing");
        assert_eq!(stage.next(), Some(IntakeStage::Completed));
        assert_eq!(IntakeStage::Completed.next(), None);
        assert_eq!(IntakeStage::Completed.status().as_str(), "completed");
    }

    #[test]
    fn test_found_lifecycle_has_no_processing_stage() {
        let stage = IntakeStage::initial(ReportKind::Found);
        assert_eq!(stage.status().as_str(), "active");
        assert_eq!(stage.next(), None);
    }
}
