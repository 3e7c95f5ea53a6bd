use invsight_core::{ProductName, SourceId};
use serde::Serialize;

use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct ProductsResponse<'a> {
    products: &'a [ProductName],
    count: usize,
}

pub fn run(context: &Context) -> Result<CommandResult, CliError> {
    let dataset = context.dataset()?;
    let products = dataset.table.products();
    let data = serde_json::to_value(ProductsResponse {
        products,
        count: products.len(),
    })?;

    let mut result =
        CommandResult::ok(data, vec![SourceId::Dataset]).with_cache_hit(dataset.cache_hit);
    if products.is_empty() {
        result = result.with_warning("dataset has no rows");
    }
    Ok(result)
}
