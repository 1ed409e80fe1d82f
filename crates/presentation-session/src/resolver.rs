//! Secondary display discovery.

use std::sync::Arc;

use tracing::{debug, info};

use presentation_core::{Error, ResolveStrategy, Result, Route, RouteCapability};

use crate::platform::RouteProvider;

/// Resolves the output route a presentation should be bound to.
///
/// Nothing is cached: every call queries the platform again, so the result
/// follows whatever output the platform currently associates with the
/// requested capability.
pub struct DisplayRouteResolver {
    provider: Arc<dyn RouteProvider>,
    strategy: ResolveStrategy,
}

impl DisplayRouteResolver {
    /// Create a resolver using the media-route strategy.
    pub fn new(provider: Arc<dyn RouteProvider>) -> Self {
        Self::with_strategy(provider, ResolveStrategy::MediaRoute)
    }

    /// Create a resolver with an explicit strategy.
    pub fn with_strategy(provider: Arc<dyn RouteProvider>, strategy: ResolveStrategy) -> Self {
        Self { provider, strategy }
    }

    /// Resolve a route offering `capability` that carries a presentation display.
    ///
    /// Returns [`Error::NoRoute`] when no route matches or the matching route
    /// has no display attached.
    pub fn resolve(&self, capability: RouteCapability) -> Result<Route> {
        let route = match self.strategy {
            ResolveStrategy::MediaRoute => self.resolve_media_route(capability),
            ResolveStrategy::DisplayEnumeration => self.resolve_enumerated(),
        };

        match route {
            Some(route) => {
                info!(
                    "Resolved route: name='{}', display={:?}, strategy={:?}",
                    route.name,
                    route.presentation_display.as_ref().map(|d| d.id),
                    self.strategy
                );
                Ok(route)
            }
            None => {
                info!(
                    "No presentation route: capability={}, strategy={:?}",
                    capability, self.strategy
                );
                Err(Error::NoRoute)
            }
        }
    }

    /// The selected route for the capability wins, otherwise the first one
    /// offering it.
    fn resolve_media_route(&self, capability: RouteCapability) -> Option<Route> {
        let candidates: Vec<Route> = self
            .provider
            .routes()
            .into_iter()
            .filter(|route| route.supports(capability))
            .collect();
        debug!("{} route(s) offer {}", candidates.len(), capability);

        let position = candidates
            .iter()
            .position(|route| route.selected)
            .unwrap_or(0);
        let route = candidates.into_iter().nth(position)?;

        if route.presentation_display.is_none() {
            debug!("Route '{}' has no presentation display", route.name);
            return None;
        }
        Some(route)
    }

    fn resolve_enumerated(&self) -> Option<Route> {
        let display = self
            .provider
            .displays()
            .into_iter()
            .find(|display| !display.is_default() && display.presentation_capable)?;

        Some(Route::new(display.name.clone(), Vec::new()).with_display(display))
    }
}
