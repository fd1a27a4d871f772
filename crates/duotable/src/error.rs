//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `TableError`, adding entity and key context
//! without changing the failure's recoverability classification.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;

use duotable_core::TableError;

/// Map a PutItem SDK error to TableError.
pub(crate) fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    entity: &'static str,
    key: String,
) -> TableError {
    let message = match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => format!("table not found for {key}"),
        PutItemError::ConditionalCheckFailedException(_) => {
            format!("conditional check failed for {key} (version conflict)")
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            format!("throughput exceeded for {key}, please retry")
        }
        PutItemError::RequestLimitExceeded(_) => {
            format!("request limit exceeded for {key}, please retry")
        }
        PutItemError::TransactionConflictException(_) => {
            format!("transaction conflict for {key}, please retry")
        }
        PutItemError::InternalServerError(_) => {
            format!("DynamoDB internal server error for {key}")
        }
        err => format!("PutItem failed for {key}: {err:?}"),
    };
    TableError::store(entity, "put", message)
}

/// Map a GetItem SDK error to TableError.
pub(crate) fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    entity: &'static str,
    key: String,
) -> TableError {
    let message = match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => format!("table not found for {key}"),
        GetItemError::ProvisionedThroughputExceededException(_) => {
            format!("throughput exceeded for {key}, please retry")
        }
        GetItemError::RequestLimitExceeded(_) => {
            format!("request limit exceeded for {key}, please retry")
        }
        GetItemError::InternalServerError(_) => {
            format!("DynamoDB internal server error for {key}")
        }
        err => format!("GetItem failed for {key}: {err:?}"),
    };
    TableError::store(entity, "get", message)
}

/// Map a Query SDK error to TableError.
pub(crate) fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    entity: &'static str,
) -> TableError {
    let message = match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => "table not found".to_string(),
        QueryError::ProvisionedThroughputExceededException(_) => {
            "throughput exceeded, please retry".to_string()
        }
        QueryError::RequestLimitExceeded(_) => "request limit exceeded, please retry".to_string(),
        QueryError::InternalServerError(_) => "DynamoDB internal server error".to_string(),
        err => format!("Query failed: {err:?}"),
    };
    TableError::store(entity, "query", message)
}

/// Map a DeleteItem SDK error to TableError.
pub(crate) fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    entity: &'static str,
    key: String,
) -> TableError {
    let message = match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => format!("table not found for {key}"),
        DeleteItemError::ConditionalCheckFailedException(_) => {
            format!("conditional check failed for {key} (version conflict)")
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            format!("throughput exceeded for {key}, please retry")
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            format!("request limit exceeded for {key}, please retry")
        }
        DeleteItemError::TransactionConflictException(_) => {
            format!("transaction conflict for {key}, please retry")
        }
        DeleteItemError::InternalServerError(_) => {
            format!("DynamoDB internal server error for {key}")
        }
        err => format!("DeleteItem failed for {key}: {err:?}"),
    };
    TableError::store(entity, "delete", message)
}

/// Map a CreateTable SDK error to TableError.
pub(crate) fn map_create_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<CreateTableError, R>,
    table_name: &str,
) -> TableError {
    let message = match err.into_service_error() {
        CreateTableError::ResourceInUseException(_) => {
            format!("table {table_name} already exists or is being created")
        }
        CreateTableError::LimitExceededException(_) => {
            format!("table limit exceeded while creating {table_name}")
        }
        CreateTableError::InternalServerError(_) => {
            format!("DynamoDB internal server error while creating {table_name}")
        }
        err => format!("CreateTable failed for {table_name}: {err:?}"),
    };
    TableError::store("Table", "provision", message)
}
