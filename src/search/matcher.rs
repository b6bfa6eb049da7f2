//! Per-query line predicates.
//!
//! A [`Matcher`] decides whether a record that already passed the time window is a hit.
//! Matching never fails: a line without the expected pattern, or with coordinates that do
//! not parse, simply does not match.

use memchr::memmem::Finder;

/// A point on the map plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Which fields of a `<a, b, c>` coordinate group hold the x and y axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateLayout {
    /// `<x, y, ...>`: first and second fields
    Planar,
    /// `<x, _, y>`: first and third fields, the middle field is skipped
    SkipMiddle,
}

impl CoordinateLayout {
    fn axes(self) -> (usize, usize) {
        match self {
            Self::Planar => (0, 1),
            Self::SkipMiddle => (0, 2),
        }
    }
}

/// Content of the first `<...>` group in `line`
pub fn bracket_group(line: &str) -> Option<&str> {
    let open = line.find('<')?;
    let inner = &line[open + 1..];
    let close = inner.find('>')?;
    Some(&inner[..close])
}

/// Position read from the first coordinate group of `line`
pub fn event_position(line: &str, layout: CoordinateLayout) -> Option<Point> {
    let group = bracket_group(line)?;
    let fields: Vec<&str> = group.split(", ").collect();
    let (x_axis, y_axis) = layout.axes();
    let x = parse_coordinate(fields.get(x_axis)?)?;
    let y = parse_coordinate(fields.get(y_axis)?)?;
    Some(Point::new(x, y))
}

fn parse_coordinate(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Literal, case-sensitive substring match.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    finder: Finder<'static>,
}

impl KeywordMatcher {
    pub fn new(keyword: &str) -> Self {
        Self {
            finder: Finder::new(keyword.as_bytes()).into_owned(),
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.finder.find(line.as_bytes()).is_some()
    }
}

/// Matches lines whose first coordinate group lies within `radius` of `origin`.
#[derive(Debug, Clone)]
pub struct RadiusMatcher {
    origin: Point,
    radius: f64,
    layout: CoordinateLayout,
}

impl RadiusMatcher {
    pub fn new(origin: Point, radius: f64) -> Self {
        Self::with_layout(origin, radius, CoordinateLayout::Planar)
    }

    pub fn with_layout(origin: Point, radius: f64, layout: CoordinateLayout) -> Self {
        Self {
            origin,
            radius,
            layout,
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        event_position(line, self.layout)
            .is_some_and(|position| self.origin.distance_to(position) <= self.radius)
    }
}

/// A radius match restricted to lines containing a category marker such as `DISMANTLED`.
///
/// Category lines carry a three-field coordinate group; x and y are its first and third
/// fields.
#[derive(Debug, Clone)]
pub struct CategoryRadiusMatcher {
    category: KeywordMatcher,
    radius: RadiusMatcher,
}

impl CategoryRadiusMatcher {
    pub fn new(origin: Point, radius: f64, category: &str) -> Self {
        Self {
            category: KeywordMatcher::new(category),
            radius: RadiusMatcher::with_layout(origin, radius, CoordinateLayout::SkipMiddle),
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.category.is_match(line) && self.radius.is_match(line)
    }
}

/// The predicate selected by a query variant.
#[derive(Debug, Clone)]
pub enum Matcher {
    Keyword(KeywordMatcher),
    Radius(RadiusMatcher),
    CategoryRadius(CategoryRadiusMatcher),
}

impl Matcher {
    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Keyword(m) => m.is_match(line),
            Self::Radius(m) => m.is_match(line),
            Self::CategoryRadius(m) => m.is_match(line),
        }
    }
}
