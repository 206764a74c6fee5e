/// A delimited trailing parameter, e.g. `/hello/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailParam {
    pub delim: char,
    pub content: String,
}

impl TrailParam {
    pub fn new(delim: char, content: String) -> Self {
        Self { delim, content }
    }
}
