//! End-to-end scenarios for the set game engine live in `tests/`.
