/// The [`DatabaseConnectionProvider`] trait provides a way to get a connection to the database.
/// This is implemented by the [`crate::Database`] and [`crate::DatabaseTransaction`] types.
pub trait DatabaseConnectionProvider {
    /// The type of the connection.
    type Connection: sea_orm::ConnectionTrait + Sync;

    /// Returns a reference to the database connection that implements the `ConnectionTrait`.
    fn get_connection(&self) -> &Self::Connection;
}
