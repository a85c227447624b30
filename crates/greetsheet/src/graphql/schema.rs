use std::sync::Arc;

use juniper::{
    graphql_object, EmptyMutation, EmptySubscription, FieldError, FieldResult, RootNode, Value,
};

use greetsheet_core::entries::QueryError;
use greetsheet_core::storage::EntryRepository;

use super::resolvers;

/// Per-request GraphQL context.
#[derive(Clone)]
pub struct Context {
    pub entry_repo: Arc<dyn EntryRepository>,
    pub test_value: Option<String>,
}

impl juniper::Context for Context {}

pub struct Query;

#[graphql_object]
#[graphql(context = Context)]
impl Query {
    /// Returns the configured `TEST` value.
    fn test(context: &Context) -> Option<String> {
        context.test_value.clone()
    }

    /// True if the code exists and has not been redeemed yet.
    async fn is_valid_code(code: Option<String>, context: &Context) -> FieldResult<Option<bool>> {
        resolvers::is_valid_code(context.entry_repo.as_ref(), code.as_deref())
            .await
            .map(Some)
            .map_err(into_field_error)
    }

    /// The greeting for a code, empty if the code is unknown.
    async fn greeting(code: Option<String>, context: &Context) -> FieldResult<Option<String>> {
        resolvers::greeting(context.entry_repo.as_ref(), code.as_deref())
            .await
            .map_err(into_field_error)
    }
}

pub type Schema = RootNode<'static, Query, EmptyMutation<Context>, EmptySubscription<Context>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, EmptyMutation::new(), EmptySubscription::new())
}

/// Converts a query error into a field error carrying `extensions.code`.
///
/// Source failures are already logged by the repository.
fn into_field_error(err: QueryError) -> FieldError {
    let mut extensions = juniper::Object::with_capacity(1);
    extensions.add_field("code", Value::scalar(err.code().to_string()));

    FieldError::new(err, Value::Object(extensions))
}
