// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The state mutator abstraction and closure adapters.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;

/// An operation that turns an input into a new piece of state.
///
/// Mutators may suspend and may fail. Inputs and outputs must be
/// serializable so the middleware can snapshot them into trace records;
/// nothing else about their shape is assumed.
///
/// # Example
///
/// ```rust,ignore
/// use snip::middleware::StateMutator;
///
/// struct SetTitle;
///
/// #[async_trait]
/// impl StateMutator for SetTitle {
///     type Input = String;
///     type Output = String;
///     type Error = std::convert::Infallible;
///
///     async fn apply(&self, title: String) -> Result<String, Self::Error> {
///         Ok(title)
///     }
/// }
/// ```
#[async_trait]
pub trait StateMutator: Send + Sync {
    type Input: Serialize + Send + 'static;
    type Output: Serialize + Send + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run the operation once.
    async fn apply(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;
}

/// Mutator backed by an async closure. Built with [`from_fn`].
pub struct FnMutator<F, I, O, E> {
    f: F,
    _marker: PhantomData<fn(I) -> Result<O, E>>,
}

/// Turn an async closure into a [`StateMutator`].
pub fn from_fn<F, Fut, I, O, E>(f: F) -> FnMutator<F, I, O, E>
where
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
{
    FnMutator {
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, I, O, E> StateMutator for FnMutator<F, I, O, E>
where
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
    I: Serialize + Send + 'static,
    O: Serialize + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    type Input = I;
    type Output = O;
    type Error = E;

    async fn apply(&self, input: I) -> Result<O, E> {
        (self.f)(input).await
    }
}

/// Mutator backed by a plain synchronous closure. Built with [`from_sync_fn`].
pub struct SyncFnMutator<F, I, O, E> {
    f: F,
    _marker: PhantomData<fn(I) -> Result<O, E>>,
}

/// Turn a synchronous closure into a [`StateMutator`].
pub fn from_sync_fn<F, I, O, E>(f: F) -> SyncFnMutator<F, I, O, E>
where
    F: Fn(I) -> Result<O, E> + Send + Sync,
{
    SyncFnMutator {
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<F, I, O, E> StateMutator for SyncFnMutator<F, I, O, E>
where
    F: Fn(I) -> Result<O, E> + Send + Sync,
    I: Serialize + Send + 'static,
    O: Serialize + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    type Input = I;
    type Output = O;
    type Error = E;

    async fn apply(&self, input: I) -> Result<O, E> {
        (self.f)(input)
    }
}
