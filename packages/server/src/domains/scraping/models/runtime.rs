use crate::common::Rejection;
use crate::config::ScrapeLimits;

/// Seconds the scraper may run once its container is warm.
///
/// The caller's budget includes container warmup; the adjusted value is
/// what the scraper itself receives as `MAX_RUNTIME`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeBudget {
    pub requested: i64,
    pub adjusted: i64,
}

impl RuntimeBudget {
    pub fn from_request(raw: Option<&str>, limits: &ScrapeLimits) -> Result<Self, Rejection> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(Rejection::MissingRuntime);
        }

        // Budgets without a leading integer can never land inside the bounds
        let requested = leading_integer(raw).ok_or(Rejection::RuntimeOutOfBounds)?;

        if requested <= limits.fargate_warmup {
            return Err(Rejection::RuntimeWithinWarmup);
        }

        let adjusted = requested - limits.fargate_warmup;
        if adjusted < limits.min_runtime || adjusted > limits.max_runtime {
            return Err(Rejection::RuntimeOutOfBounds);
        }

        Ok(Self {
            requested,
            adjusted,
        })
    }
}

/// Integer at the start of `raw`, ignoring whatever follows it.
///
/// `"600"`, `"600.0"` and `"600s"` all read as 600; text that does not start
/// with an optionally signed digit reads as nothing.
pub fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }

    let sign_len = raw.len() - unsigned.len();
    raw[..sign_len + digits].parse().ok()
}
