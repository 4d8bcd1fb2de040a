//! Paginated and Stream results for file listings.
//!
//! `FilePage` wraps a `ListFilesResponse` with the information needed to
//! fetch subsequent pages, following the `after` cursor while the service
//! reports `has_more`. Fetch everything as a stream with
//! [`into_stream()`](FilePage::into_stream), or collect into a vector with
//! [`collect_all()`](FilePage::collect_all).
//!
use std::{fmt, ops::Deref, sync::Arc};

use futures::{
    StreamExt,
    stream::{BoxStream, unfold},
};
use serde::{Serialize, ser::Serializer};

use crate::{
    Result,
    files::{File, ListFilesResponse},
    http_client::{HttpClient, HttpRequest},
};

/// One page of a file listing, with cursor state for fetching the rest.
///
/// `FilePage` implements `Deref` to `ListFilesResponse`, so you can access
/// `.data`, `.has_more`, `.total`, `.len()`, etc. directly.
///
/// # Example
///
/// ```rust,no_run
/// use llmfiles::prelude::*;
/// use futures::StreamExt;
///
/// # async fn example(client: &FilesClient) -> Result<(), FilesError> {
/// // Access the first page directly via Deref
/// let page = client.files().list().await?;
/// println!("First page: {} items, total: {}", page.len(), page.total);
///
/// // Stream all files from all pages
/// let mut stream = client.files().list().await?.into_stream();
/// while let Some(file) = stream.next().await {
///     println!("{}", file?.id);
/// }
///
/// // Or collect all files
/// let all = client.files().list().await?.collect_all().await?;
/// # Ok(())
/// # }
/// ```
pub struct FilePage {
    response: ListFilesResponse,
    refill: Option<Refill>,
}

// client and request object needed to fetch the next page
#[derive(Clone)]
struct Refill {
    client: Arc<HttpClient>,
    request: HttpRequest,
}

impl FilePage {
    /// Creates a new FilePage from a response, client, and the original request.
    pub(crate) fn new(
        response: ListFilesResponse,
        client: Arc<HttpClient>,
        request: HttpRequest,
    ) -> Self {
        Self {
            response,
            refill: Some(Refill { client, request }),
        }
    }

    /// Constructs a single-page result that will never refill.
    #[allow(dead_code)]
    fn single_page(response: ListFilesResponse) -> Self {
        Self {
            response,
            refill: None,
        }
    }

    /// Consumes this result and returns the underlying `ListFilesResponse`.
    pub fn into_response(self) -> ListFilesResponse {
        self.response
    }

    /// Converts this page into a stream of all files across all pages.
    ///
    /// The stream yields files from the first page immediately, then fetches
    /// subsequent pages as needed while the service reports `has_more`,
    /// using the id of the last file seen as the `after` cursor.
    pub fn into_stream(self) -> BoxStream<'static, Result<File>> {
        let cursor = self.response.data.last().map(|file| file.id.clone());
        let items = self.response.data.into_iter();
        let has_more = self.response.has_more;
        let refill = self.refill;

        unfold(
            (items, has_more, cursor, refill, false),
            move |(mut items, has_more, cursor, refill, errored)| async move {
                // If we've already errored, stop the stream
                if errored {
                    return None;
                }

                // Try to get the next file from the current page
                if let Some(item) = items.next() {
                    return Some((Ok(item), (items, has_more, cursor, refill, false)));
                }

                // Current page exhausted, fetch the next one if available
                if !has_more {
                    return None;
                }
                let Some(refill) = refill else {
                    return None;
                };
                let Some(after) = cursor else {
                    return None;
                };

                let next_request = refill.request.with_after(&after);
                match refill.client.send::<ListFilesResponse>(next_request).await {
                    Ok(next_response) => {
                        let new_has_more = next_response.has_more;
                        let new_cursor = next_response.data.last().map(|file| file.id.clone());
                        let mut new_items = next_response.data.into_iter();

                        // an empty page stops iteration
                        new_items.next().map(|item| {
                            (
                                Ok(item),
                                (new_items, new_has_more, new_cursor, Some(refill), false),
                            )
                        })
                    }
                    Err(err) => Some((
                        Err(err),
                        (Vec::<File>::new().into_iter(), false, None, None, true),
                    )),
                }
            },
        )
        .boxed()
    }

    /// Fetches all remaining pages and returns every file in one vector.
    pub async fn collect_all(self) -> Result<Vec<File>> {
        let mut items = self.response.data;
        let mut has_more = self.response.has_more;

        if let Some(refill) = self.refill {
            while has_more {
                let Some(after) = items.last().map(|file| file.id.clone()) else {
                    break;
                };
                let next: ListFilesResponse = refill
                    .client
                    .send(refill.request.with_after(&after))
                    .await?;
                has_more = next.has_more;
                if next.data.is_empty() {
                    break;
                }
                items.extend(next.data);
            }
        }
        Ok(items)
    }
}

impl Deref for FilePage {
    type Target = ListFilesResponse;

    fn deref(&self) -> &Self::Target {
        &self.response
    }
}

// Implement Debug by delegating to the inner response
impl fmt::Debug for FilePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePage")
            .field("response", &self.response)
            .finish()
    }
}

// Implement Serialize by delegating to the inner response
// This allows CLI code to serialize FilePage as if it were ListFilesResponse
impl Serialize for FilePage {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.response.serialize(serializer)
    }
}
