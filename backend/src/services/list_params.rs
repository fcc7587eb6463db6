use thiserror::Error;

pub const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
    #[error("Operator {0} is not supported for numeric fields")]
    UnsupportedOperator(String),
}

/// Queryable fields, by their wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Title,
    Description,
    Category,
    Progress,
    CreatedAt,
    UpdatedAt,
}

impl Column {
    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "id" => Some(Column::Id),
            "title" => Some(Column::Title),
            "description" => Some(Column::Description),
            "category" => Some(Column::Category),
            "progress" => Some(Column::Progress),
            "createdAt" => Some(Column::CreatedAt),
            "updatedAt" => Some(Column::UpdatedAt),
            _ => None,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Title => "title",
            Column::Description => "description",
            Column::Category => "category",
            Column::Progress => "progress",
            Column::CreatedAt => "created_at",
            Column::UpdatedAt => "updated_at",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Progress | Column::CreatedAt | Column::UpdatedAt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gte,
    Lte,
    Like,
}

impl Operator {
    pub fn sql(&self) -> &'static str {
        match self {
            Operator::Eq => " = ",
            Operator::Ne => " != ",
            Operator::Gte => " >= ",
            Operator::Lte => " <= ",
            Operator::Like => " LIKE ",
        }
    }

    /// Splits `field_op` into the field and its operator.
    fn split(key: &str) -> (&str, Operator) {
        for (suffix, op) in [
            ("_gte", Operator::Gte),
            ("_lte", Operator::Lte),
            ("_ne", Operator::Ne),
            ("_like", Operator::Like),
        ] {
            if let Some(field) = key.strip_suffix(suffix) {
                return (field, op);
            }
        }
        (key, Operator::Eq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: Column,
    pub op: Operator,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: Column,
    pub descending: bool,
}

/// A parsed list request in mock JSON server syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub conditions: Vec<Condition>,
    /// `q`: substring match over title and description.
    pub search: Option<String>,
    pub sorts: Vec<Sort>,
    /// `None` when `_page` is absent, in which case every match is returned
    /// as a bare array.
    pub page: Option<u32>,
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            search: None,
            sorts: Vec::new(),
            page: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListParams {
    pub fn parse(pairs: &[(String, String)]) -> Result<Self, ParamError> {
        let mut params = ListParams::default();

        for (key, value) in pairs {
            match key.as_str() {
                "_page" => params.page = Some(parse_positive(key, value)?),
                "_per_page" | "_limit" => params.per_page = parse_positive(key, value)?,
                "_sort" => params.sorts = parse_sort(value),
                "q" => {
                    let search = value.trim();
                    if !search.is_empty() {
                        params.search = Some(search.to_string());
                    }
                }
                _ if key.starts_with('_') => {
                    log::debug!("Ignoring unsupported list option {}", key);
                }
                _ => {
                    if let Some(condition) = parse_condition(key, value)? {
                        params.conditions.push(condition);
                    }
                }
            }
        }

        Ok(params)
    }

    pub fn offset(&self) -> i64 {
        self.page
            .map(|page| i64::from(page - 1).saturating_mul(i64::from(self.per_page)))
            .unwrap_or(0)
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u32, ParamError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| ParamError::InvalidValue(key.to_string()))
}

/// Escape character for the `LIKE` patterns built by [`like_pattern`].
pub const LIKE_ESCAPE: &str = " ESCAPE '\\'";

/// Substring pattern with `%`, `_` and `\` in `value` matched literally.
pub fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `_sort=-updatedAt,title`: comma-separated fields, `-` for descending.
fn parse_sort(value: &str) -> Vec<Sort> {
    value
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .filter_map(|field| {
            let (name, descending) = match field.strip_prefix('-') {
                Some(name) => (name, true),
                None => (field, false),
            };
            let column = Column::from_field(name);
            if column.is_none() {
                log::debug!("Ignoring sort on unknown field {}", name);
            }
            column.map(|column| Sort { column, descending })
        })
        .collect()
}

fn parse_condition(key: &str, value: &str) -> Result<Option<Condition>, ParamError> {
    let (field, op) = Operator::split(key);
    let Some(column) = Column::from_field(field) else {
        log::debug!("Ignoring filter on unknown field {}", field);
        return Ok(None);
    };

    let value = if column.is_numeric() {
        if op == Operator::Like {
            return Err(ParamError::UnsupportedOperator(key.to_string()));
        }
        let number = value
            .trim()
            .parse::<i64>()
            .map_err(|_| ParamError::InvalidValue(key.to_string()))?;
        FilterValue::Int(number)
    } else if op == Operator::Like {
        FilterValue::Text(like_pattern(value))
    } else {
        FilterValue::Text(value.to_string())
    };

    Ok(Some(Condition { column, op, value }))
}
