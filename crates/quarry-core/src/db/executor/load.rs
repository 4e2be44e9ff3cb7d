use crate::{
    db::{
        Db,
        query::{QueryError, ResultShape},
        store::{RowCallback, StoreRequest, SubmissionHandle},
    },
    error::Error,
    traits::EntityValue,
};
use std::marker::PhantomData;

///
/// LoadExecutor
///
/// Typed read boundary: sends one lowered request to the store and adapts
/// the raw rows into the declared result shape.
///

pub struct LoadExecutor<'a, E: EntityValue> {
    db: &'a Db,
    _marker: PhantomData<E>,
}

impl<'a, E: EntityValue> LoadExecutor<'a, E> {
    #[must_use]
    pub(crate) const fn new(db: &'a Db) -> Self {
        Self {
            db,
            _marker: PhantomData,
        }
    }

    pub fn execute<S: ResultShape<E>>(&self, request: &StoreRequest) -> Result<S::Output, Error> {
        if self.db.config().debug {
            log::debug!("load {}: {request:?}", E::ENTITY_NAME);
        }

        let rows = self
            .db
            .store()
            .execute(request)
            .map_err(QueryError::Store)?;

        S::adapt(rows).map_err(|err| QueryError::Shape(err).into())
    }

    /// Submit for asynchronous execution. Runtime store failures degrade
    /// to the shape's empty value inside the completion; a result that
    /// does not match the declared shape is a misconfigured request and
    /// halts loudly on the delivery thread.
    pub fn submit<S, F>(&self, request: StoreRequest, completion: F) -> Result<SubmissionHandle, Error>
    where
        S: ResultShape<E>,
        F: FnOnce(S::Output) + Send + 'static,
    {
        if self.db.config().debug {
            log::debug!("submit {}: {request:?}", E::ENTITY_NAME);
        }

        let callback: RowCallback = Box::new(move |result| {
            let output = match result {
                Ok(rows) => match S::adapt(rows) {
                    Ok(output) => output,
                    Err(err) => {
                        log::error!("async {} fetch misconfigured: {err}", E::ENTITY_NAME);
                        panic!("misconfigured request: {err}");
                    }
                },
                Err(err) => {
                    log::warn!(
                        "async {} fetch failed; delivering empty {} result: {err}",
                        E::ENTITY_NAME,
                        S::NAME
                    );
                    S::empty()
                }
            };

            completion(output);
        });

        self.db
            .store()
            .submit(request, callback)
            .map_err(|err| QueryError::Store(err).into())
    }
}
