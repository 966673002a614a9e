use crate::database::{Store, Tables};
use crate::error::AppError;

impl Store {
    /// Run a closure against a working copy of the tables under the write
    /// lock. The copy replaces the live tables only when the closure returns
    /// `Ok`, so a failed transition leaves no partial state behind.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Tables) -> Result<T, AppError>,
    {
        let mut guard = self.inner.write().await;
        let mut working = guard.clone();

        match f(&mut working) {
            Ok(value) => {
                *guard = working;
                Ok(value)
            }
            Err(err) => {
                log::warn!("Transaction failed with error: {}, rolling back", err);
                Err(err)
            }
        }
    }
}
