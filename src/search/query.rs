//! Structured search queries.
//!
//! A [`SearchQuery`] is built from a fixed-arity argument list and validated before any
//! file is touched. The three variants share the time window and differ only in the
//! [`Matcher`] they select.

use crate::error::ValidationError;
use crate::search::matcher::{CategoryRadiusMatcher, KeywordMatcher, Matcher, Point, RadiusMatcher};
use crate::search::time_window::{TimeWindow, QUERY_DATE_FORMAT, QUERY_TIME_FORMAT};

/// Category marker required by the dismantled-event search
pub const DISMANTLED_CATEGORY: &str = "DISMANTLED";
/// Largest radius accepted by a plain radius search
pub const RADIUS_CEILING: f64 = 100.0;
/// Largest radius accepted by a category radius search
pub const CATEGORY_RADIUS_CEILING: f64 = 1000.0;

/// The kind of a query, independent of its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Keyword,
    Radius,
    CategoryRadius,
}

impl QueryKind {
    /// Number of arguments after the command name
    pub fn arity(self) -> usize {
        match self {
            Self::Keyword => 4,
            Self::Radius | Self::CategoryRadius => 6,
        }
    }

    /// Maximum radius, for the spatial variants
    pub fn radius_ceiling(self) -> Option<f64> {
        match self {
            Self::Keyword => None,
            Self::Radius => Some(RADIUS_CEILING),
            Self::CategoryRadius => Some(CATEGORY_RADIUS_CEILING),
        }
    }

    /// Chat command that selects this kind
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Keyword => "/search-keyword",
            Self::Radius => "/search-radius",
            Self::CategoryRadius => "/search-dismantle",
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            Self::Keyword => "/search-keyword <date> <time start> <time end> <keyword>",
            Self::Radius => "/search-radius <date> <time start> <time end> <x> <y> <radius>",
            Self::CategoryRadius => {
                "/search-dismantle <date> <time start> <time end> <x> <y> <radius>"
            }
        }
    }
}

/// A validated-on-demand search request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    Keyword {
        window: TimeWindow,
        keyword: String,
    },
    Radius {
        window: TimeWindow,
        origin: Point,
        radius: f64,
    },
    CategoryRadius {
        window: TimeWindow,
        origin: Point,
        radius: f64,
        category: String,
    },
}

impl SearchQuery {
    pub fn keyword(window: TimeWindow, keyword: impl Into<String>) -> Self {
        Self::Keyword {
            window,
            keyword: keyword.into(),
        }
    }

    pub fn radius(window: TimeWindow, origin: Point, radius: f64) -> Self {
        Self::Radius {
            window,
            origin,
            radius,
        }
    }

    /// Category radius search for `DISMANTLED` events
    pub fn dismantled(window: TimeWindow, origin: Point, radius: f64) -> Self {
        Self::CategoryRadius {
            window,
            origin,
            radius,
            category: DISMANTLED_CATEGORY.to_string(),
        }
    }

    /// Parse the arguments following a command name
    ///
    /// Keyword queries take `date start end keyword`; spatial queries take
    /// `date start end x y radius`. The result is validated before it is returned.
    pub fn from_args(kind: QueryKind, args: &[&str]) -> Result<Self, ValidationError> {
        if args.len() != kind.arity() {
            return Err(ValidationError::ArgumentCount {
                command: kind.command_name().to_string(),
                usage: kind.usage(),
                expected: kind.arity(),
                found: args.len(),
            });
        }

        let window = TimeWindow::parse(args[0], args[1], args[2])?;
        let query = match kind {
            QueryKind::Keyword => Self::keyword(window, args[3]),
            QueryKind::Radius | QueryKind::CategoryRadius => {
                let origin = Point::new(parse_number("x", args[3])?, parse_number("y", args[4])?);
                let radius = parse_number("radius", args[5])?;
                if kind == QueryKind::Radius {
                    Self::radius(window, origin, radius)
                } else {
                    Self::dismantled(window, origin, radius)
                }
            }
        };

        query.validate()?;
        Ok(query)
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            Self::Keyword { .. } => QueryKind::Keyword,
            Self::Radius { .. } => QueryKind::Radius,
            Self::CategoryRadius { .. } => QueryKind::CategoryRadius,
        }
    }

    pub fn window(&self) -> &TimeWindow {
        match self {
            Self::Keyword { window, .. }
            | Self::Radius { window, .. }
            | Self::CategoryRadius { window, .. } => window,
        }
    }

    /// Search radius, for the spatial variants
    pub fn search_radius(&self) -> Option<f64> {
        match self {
            Self::Keyword { .. } => None,
            Self::Radius { radius, .. } | Self::CategoryRadius { radius, .. } => Some(*radius),
        }
    }

    /// Query date as `DD.MM.YYYY`
    pub fn display_date(&self) -> String {
        self.window().start().format(QUERY_DATE_FORMAT).to_string()
    }

    /// Window boundaries as `HH:mm`
    pub fn display_times(&self) -> (String, String) {
        let window = self.window();
        (
            window.start().format(QUERY_TIME_FORMAT).to_string(),
            window.end().format(QUERY_TIME_FORMAT).to_string(),
        )
    }

    /// Check the invariants a scan relies on
    ///
    /// A radius equal to the ceiling is accepted; anything above it is rejected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let window = self.window();
        if window.start() >= window.end() {
            return Err(ValidationError::InvertedWindow {
                start: window.start().to_string(),
                end: window.end().to_string(),
            });
        }

        if let Self::Keyword { keyword, .. } = self {
            if keyword.is_empty() {
                return Err(ValidationError::EmptyKeyword);
            }
        }

        if let (Some(radius), Some(ceiling)) = (self.search_radius(), self.kind().radius_ceiling())
        {
            if !radius.is_finite() {
                return Err(ValidationError::InvalidNumber {
                    field: "radius",
                    input: radius.to_string(),
                });
            }
            if radius < 0.0 {
                return Err(ValidationError::NegativeRadius { radius });
            }
            if radius > ceiling {
                return Err(ValidationError::RadiusExceedsCeiling { radius, ceiling });
            }
        }

        Ok(())
    }

    /// The line predicate for this query
    pub fn matcher(&self) -> Matcher {
        match self {
            Self::Keyword { keyword, .. } => Matcher::Keyword(KeywordMatcher::new(keyword)),
            Self::Radius { origin, radius, .. } => {
                Matcher::Radius(RadiusMatcher::new(*origin, *radius))
            }
            Self::CategoryRadius {
                origin,
                radius,
                category,
                ..
            } => Matcher::CategoryRadius(CategoryRadiusMatcher::new(*origin, *radius, category)),
        }
    }
}

fn parse_number(field: &'static str, input: &str) -> Result<f64, ValidationError> {
    input
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidationError::InvalidNumber {
            field,
            input: input.to_string(),
        })
}
