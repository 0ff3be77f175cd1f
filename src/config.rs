/// Settings a [`Scene`](crate::Scene) is created with.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Name given to the root object.
    pub root_name: String,
    /// Number of objects to reserve arena space for.
    pub object_capacity: usize,
    /// Number of features to reserve arena space for.
    pub feature_capacity: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            root_name: String::from("Scene"),
            object_capacity: 64,
            feature_capacity: 64,
        }
    }
}
