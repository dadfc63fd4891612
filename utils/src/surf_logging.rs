use std::time::Instant;
use surf::middleware::{Middleware, Next};
use surf::{Client, Request, Response};

/// Logs every outbound request together with its status and round-trip time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SurfLogging;

#[surf::utils::async_trait]
impl Middleware for SurfLogging {
    async fn handle(&self, req: Request, client: Client, next: Next<'_>) -> surf::Result<Response> {
        let method = req.method();
        let url = req.url().to_string();
        let started = Instant::now();
        log::debug!("{} {}", method, url);

        match next.run(req, client).await {
            Ok(res) => {
                log::info!(
                    "{} {} -> {} ({} ms)",
                    method,
                    url,
                    res.status(),
                    started.elapsed().as_millis()
                );
                Ok(res)
            }
            Err(err) => {
                log::warn!(
                    "{} {} failed after {} ms: {}",
                    method,
                    url,
                    started.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}
