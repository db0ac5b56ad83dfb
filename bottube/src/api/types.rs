//! Shared types and streaming infrastructure for the BoTTube API client.

use crate::error::Error;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::Stream;

type OneFuturePage<'a, F, T> =
    Pin<Box<dyn Future<Output = Result<(F, (VecDeque<T>, Option<u32>)), Error>> + 'a + Send>>;

/// A paginated stream that fetches numbered pages from a BoTTube list endpoint on demand.
///
/// This stream yields items one by one, fetching the next page when the current page is
/// exhausted. The fetcher returns the items of the requested page along with the number of the
/// page to fetch next, or `None` once the listing is exhausted.
pub struct PagedStream<'a, T, F> {
    /// Current batch of items from the most recent API response
    current_items: VecDeque<T>,
    /// Future representing the currently pending API request, if any
    pending_request: Option<OneFuturePage<'a, F, T>>,
    /// Whether we've reached the end of all available data
    is_done: bool,
}

impl<'a, T, F> PagedStream<'a, T, F> {
    /// Create a new PagedStream starting at `first_page`.
    pub fn new<Fut>(first_page: u32, fetcher: F) -> Self
    where
        F: Fn(u32) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = Result<(VecDeque<T>, Option<u32>), Error>> + Send + 'a,
    {
        let first_page = async move {
            let results = fetcher(first_page).await?;
            Ok((fetcher, results))
        };
        Self {
            pending_request: Some(Box::pin(first_page)),
            current_items: VecDeque::new(),
            is_done: false,
        }
    }
}

impl<'a, T: Unpin, F> Unpin for PagedStream<'a, T, F> {}

impl<'a, T: Unpin, F, Fut> Stream for PagedStream<'a, T, F>
where
    F: Fn(u32) -> Fut,
    F: Send + 'a,
    Fut: Future<Output = Result<(VecDeque<T>, Option<u32>), Error>> + Send + 'a,
{
    type Item = Result<T, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(item) = self.current_items.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if self.is_done {
                return Poll::Ready(None);
            }

            let Some(pending) = self.pending_request.as_mut() else {
                self.is_done = true;
                return Poll::Ready(None);
            };

            match pending.as_mut().poll(cx) {
                Poll::Ready(Ok((fetcher, (items, next_page)))) => {
                    self.current_items.extend(items);

                    if let Some(next_page) = next_page {
                        // Set up the next page, but only poll it once this one is drained.
                        self.pending_request = Some(Box::pin(async move {
                            let results = fetcher(next_page).await?;
                            Ok((fetcher, results))
                        }));
                    } else {
                        self.is_done = true;
                        self.pending_request = None;
                    }
                    continue;
                }
                Poll::Ready(Err(e)) => {
                    self.pending_request = None;
                    self.is_done = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// The page to fetch after `page`, given how many items it held and the reported total.
pub(crate) fn next_page(page: u32, per_page: u32, returned: usize, total: u64) -> Option<u32> {
    let seen = u64::from(page.max(1)) * u64::from(per_page);
    if per_page == 0 || returned == 0 || seen >= total {
        return None;
    }
    page.checked_add(1)
}

/// A vote on a video or comment.
///
/// Liking, disliking and clearing a vote are the same endpoint with a different value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i8)]
pub enum Vote {
    Up = 1,
    Down = -1,
    Clear = 0,
}

#[derive(Debug, Serialize)]
pub(crate) struct VoteBody {
    pub(crate) vote: Vote,
}

/// Generic acknowledgement returned by many mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ack {
    pub ok: bool,
}

/// The list of profile or wallet fields the server actually changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatedFields {
    pub updated_fields: Vec<String>,
}

/// Converts a server timestamp (Unix seconds, possibly fractional) into a [`Timestamp`].
pub(crate) fn unix_timestamp(secs: Option<f64>) -> Option<Timestamp> {
    let secs = SignedDuration::try_from_secs_f64(secs?).ok()?;
    Timestamp::from_duration(secs).ok()
}
