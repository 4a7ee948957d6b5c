mod serde_model;
