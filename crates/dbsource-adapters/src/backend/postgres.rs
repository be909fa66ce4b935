//! PostgreSQL backend using the synchronous `postgres` client.

use postgres::types::Type;
use postgres::{Client, NoTls, Row, Statement};
use thiserror::Error;
use tracing::{debug, instrument};

use dbsource_core::application::ports::{BackendError, Connection, OutParam, OutValue, SourceReader};
use dbsource_core::domain::CallDescriptor;

/// Environment variable read by [`PgConnection::from_env`].
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Errors raised by the PostgreSQL backend itself, next to driver errors.
#[derive(Debug, Error)]
pub enum PgBackendError {
    #[error("{DATABASE_URL_VAR} is not set")]
    MissingUrl,

    #[error("Call must take exactly one parameter, found {found}")]
    ParameterCount { found: usize },

    #[error("Call must return exactly one column, found {found}")]
    ColumnCount { found: usize },

    #[error("Column type {actual} cannot be read as {expected}")]
    ColumnType { expected: OutParam, actual: Type },

    #[error(transparent)]
    Driver(#[from] postgres::Error),
}

/// A template backend over one PostgreSQL session.
///
/// Call descriptors are SQL statements with a single `$1` parameter that
/// return at most one row of one column:
///
/// ```sql
/// SELECT template_api.find_template($1)   -- text
/// SELECT template_api.load_template($1)   -- text body
/// SELECT template_api.template_ts($1)     -- bigint, epoch millis
/// ```
///
/// Handles are server-side prepared statements; closing one drops it,
/// which deallocates it on the server.
pub struct PgConnection {
    client: Client,
}

impl PgConnection {
    /// Connect with a libpq-style connection string or URL.
    pub fn connect(url: &str) -> Result<Self, PgBackendError> {
        let client = Client::connect(url, NoTls)?;
        debug!("connected to template database");
        Ok(Self { client })
    }

    /// Connect using [`DATABASE_URL_VAR`].
    pub fn from_env() -> Result<Self, PgBackendError> {
        let url = database_url(std::env::var(DATABASE_URL_VAR).ok())?;
        Self::connect(&url)
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_closed()
    }
}

impl Connection for PgConnection {
    type Handle = Statement;

    #[instrument(skip(self, descriptor), fields(call = %descriptor.abbreviated()))]
    fn prepare_call(&mut self, descriptor: &CallDescriptor) -> Result<Statement, BackendError> {
        let statement = self
            .client
            .prepare(descriptor.as_str())
            .map_err(PgBackendError::from)?;
        check_shape(&statement)?;
        Ok(statement)
    }

    fn execute(
        &mut self,
        handle: &mut Statement,
        input: &str,
        output: OutParam,
    ) -> Result<OutValue, BackendError> {
        let row = self
            .client
            .query_opt(&*handle, &[&input])
            .map_err(PgBackendError::from)?;
        Ok(read_output(row.as_ref(), output)?)
    }

    fn close_call(&mut self, handle: Statement) -> Result<(), BackendError> {
        drop(handle);
        Ok(())
    }
}

impl std::fmt::Debug for PgConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgConnection")
            .field("closed", &self.client.is_closed())
            .finish()
    }
}

fn database_url(value: Option<String>) -> Result<String, PgBackendError> {
    value
        .filter(|url| !url.trim().is_empty())
        .ok_or(PgBackendError::MissingUrl)
}

fn check_shape(statement: &Statement) -> Result<(), PgBackendError> {
    let params = statement.params().len();
    if params != 1 {
        return Err(PgBackendError::ParameterCount { found: params });
    }
    let columns = statement.columns().len();
    if columns != 1 {
        return Err(PgBackendError::ColumnCount { found: columns });
    }
    Ok(())
}

fn read_output(row: Option<&Row>, output: OutParam) -> Result<OutValue, PgBackendError> {
    let Some(row) = row else {
        return Ok(match output {
            OutParam::Text => OutValue::Text(None),
            OutParam::Characters => OutValue::Characters(None),
            OutParam::Integer => OutValue::Integer(None),
        });
    };

    let value = match output {
        OutParam::Text => OutValue::Text(row.try_get::<_, Option<String>>(0)?),
        OutParam::Characters => OutValue::Characters(
            row.try_get::<_, Option<String>>(0)?
                .map(SourceReader::from_string),
        ),
        OutParam::Integer => OutValue::Integer(read_integer(row)?),
    };
    Ok(value)
}

fn read_integer(row: &Row) -> Result<Option<i64>, PgBackendError> {
    let actual = row.columns()[0].type_();
    if *actual == Type::INT8 {
        Ok(row.try_get::<_, Option<i64>>(0)?)
    } else if *actual == Type::INT4 {
        Ok(row.try_get::<_, Option<i32>>(0)?.map(i64::from))
    } else if *actual == Type::INT2 {
        Ok(row.try_get::<_, Option<i16>>(0)?.map(i64::from))
    } else {
        Err(PgBackendError::ColumnType {
            expected: OutParam::Integer,
            actual: actual.clone(),
        })
    }
}
