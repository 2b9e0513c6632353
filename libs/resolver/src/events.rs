use crate::errors::ResolutionError;
use crate::orchestrator::ResolutionOrigin;
use crate::platforms::Platform;
use crate::ParsedResult;

#[derive(Debug, Clone)]
pub enum ResolverEvent {
    Started {
        origin: ResolutionOrigin,
        platform: Platform,
    },
    Resolved {
        result: ParsedResult,
    },
    Failed {
        platform: Platform,
        error: ResolutionError,
    },
    /// Credentials are missing, the user should be sent to the settings.
    ConfigurationRequired {
        platform: Platform,
    },
    /// A link was played and the history list is stale.
    HistoryChanged,
}
