//! tests/mod.rs
//! Tests unitaires (doubles en mémoire pour le relais et le magasin).

mod support;

mod config_tests;
