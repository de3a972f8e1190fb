//! Generation job lifecycle: submit, poll, wait, fetch.

use std::sync::Arc;

mod await_completion;
mod fetch_result;
mod poll;
mod submit;

pub use await_completion::{AwaitError, AwaitOperation, PollProgress};
pub use fetch_result::{FetchError, FetchResult};
pub use poll::{classify, PollError, PollOperation};
pub use submit::{SubmitError, SubmitGeneration};

/// Container for generation use cases.
pub struct GenerationUseCases {
    pub submit: Arc<SubmitGeneration>,
    pub poll: Arc<PollOperation>,
    pub await_completion: Arc<AwaitOperation>,
    pub fetch_result: Arc<FetchResult>,
}

impl GenerationUseCases {
    pub fn new(
        submit: Arc<SubmitGeneration>,
        poll: Arc<PollOperation>,
        await_completion: Arc<AwaitOperation>,
        fetch_result: Arc<FetchResult>,
    ) -> Self {
        Self {
            submit,
            poll,
            await_completion,
            fetch_result,
        }
    }
}
