//! Conformance test suite for the rf433 protocol stack; see `tests/`.
