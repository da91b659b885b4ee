//! Workspace-level integration tests for FibKit live under `tests/`.
