use std::borrow::Cow;

/// Ordered OAuth parameter set.
///
/// Pairs keep insertion order: the marketplace verifies signatures over the
/// exact sequence that was sent, never a sorted one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameters<'a> {
    pairs: Vec<(Cow<'a, str>, Cow<'a, str>)>,
}

impl<'a> Parameters<'a> {
    pub fn new() -> Self {
        Parameters { pairs: Vec::new() }
    }

    pub fn push<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<Cow<'a, str>>,
        V: Into<Cow<'a, str>>,
    {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn extend<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'a, str>>,
        V: Into<Cow<'a, str>>,
    {
        self.pairs
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_ref())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(Cow<'a, str>, Cow<'a, str>)] {
        &self.pairs
    }

    /// `k=v` pairs joined by `separator`, verbatim.
    pub fn join(&self, separator: &str) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<String>>()
            .join(separator)
    }
}

impl<'a, K, V> FromIterator<(K, V)> for Parameters<'a>
where
    K: Into<Cow<'a, str>>,
    V: Into<Cow<'a, str>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        params.extend(iter);
        params
    }
}

/// Parse a `k=v,k=v` list such as the body of an `OAuth` header.
///
/// Values may contain `=`; only the first one splits.
pub fn parse_pairs(input: &str, separator: char) -> Parameters<'_> {
    input
        .split(separator)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.split_once('='))
        .collect()
}
