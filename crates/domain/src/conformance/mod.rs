//! Conformance cases, their fixtures and expectations.

mod case;
mod expectation;
mod fixture;
mod suite;
mod template;

pub use case::{AuthMode, CaseKind, ConformanceCase, DEFAULT_TIMING_THRESHOLD_MS, Precondition};
pub use expectation::{
    ErrorExpectation, Expectation, ExpectedState, StatusExpectation, StoreExpectation,
};
pub use fixture::{CaseFixture, KeyPair};
pub use suite::{CaseFilter, ConformanceSuite};
pub use template::{PLACEHOLDERS, Template};
