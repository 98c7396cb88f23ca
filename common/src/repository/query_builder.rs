use mongodb::bson::{doc, Bson, Document};

/// Small fluent builder for Mongo filter documents.
///
/// Conditions accumulate in the current clause; `and()` / `or()` close it and
/// start a new one so that several conditions can target the same field.
#[derive(Debug, Default, Clone)]
pub struct QueryBuilder {
    clauses: Vec<Document>,
    current: Document,
    logic_op: Option<&'static str>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.current.insert(field, value.into());
        self
    }

    pub fn ne(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.current.insert(field, doc! { "$ne": value.into() });
        self
    }

    pub fn in_array<T: Into<Bson>>(mut self, field: &str, values: Vec<T>) -> Self {
        let arr = values.into_iter().map(Into::into).collect::<Vec<_>>();
        self.current.insert(field, doc! { "$in": arr });
        self
    }

    pub fn not_in<T: Into<Bson>>(mut self, field: &str, values: Vec<T>) -> Self {
        let arr = values.into_iter().map(Into::into).collect::<Vec<_>>();
        self.current.insert(field, doc! { "$nin": arr });
        self
    }

    pub fn and(mut self) -> Self {
        self.logic_op = Some("$and");
        self.clauses.push(std::mem::take(&mut self.current));
        self
    }

    pub fn or(mut self) -> Self {
        self.logic_op = Some("$or");
        self.clauses.push(std::mem::take(&mut self.current));
        self
    }

    pub fn build(mut self) -> Document {
        if !self.current.is_empty() {
            self.clauses.push(self.current);
        }
        match self.logic_op {
            Some(op) => doc! { op: self.clauses },
            None if self.clauses.len() == 1 => self.clauses.remove(0),
            None => doc! {},
        }
    }
}
