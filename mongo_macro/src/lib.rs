extern crate proc_macro;

mod mongo_index_macro;

use proc_macro::TokenStream;

/// Derives `common::index_trait::MongoIndexModelProvider` from `#[mongo_index(...)]` attributes.
///
/// Every attribute produces one index:
///
/// ```ignore
/// #[derive(MongoIndexModelProvider)]
/// #[mongo_index(fields["pairKey"], unique, name = "uniq_pair_key")]
/// #[mongo_index(fields["recipient", "status"])]
/// pub struct FriendRequestEntity { /* ... */ }
/// ```
#[proc_macro_derive(MongoIndexModelProvider, attributes(mongo_index))]
pub fn mongo_index_model_provider(input: TokenStream) -> TokenStream {
    mongo_index_macro::expand_index_model_provider(input)
}
