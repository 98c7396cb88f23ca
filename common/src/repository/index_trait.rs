use mongodb::IndexModel;

/// Indexes a collection needs; usually derived with `#[derive(MongoIndexModelProvider)]`.
pub trait MongoIndexModelProvider {
    fn index_models() -> Vec<IndexModel>;
}
