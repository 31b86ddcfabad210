pub mod integrity_checker;

pub use integrity_checker::{
    CityStatistics, IntegrityChecker, IntegrityReport, IssueType, ReadingIssue,
};
