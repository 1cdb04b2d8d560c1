// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one command each.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No argument parsing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Loading, cleaning, labelling and splitting shared by both commands
pub mod corpus;

// The three modelling approaches
pub mod approaches;

// The `explore` workflow
pub mod explore_use_case;

// The `compare` workflow
pub mod compare_use_case;
