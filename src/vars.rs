use crate::types::StringIndexMap;

#[inline]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().map_or(false, |c| c.is_ascii_alphabetic() || c == '_') &&
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Insertion-ordered variable table, only written while parsing.
#[derive(Debug, Default)]
pub struct Vars(StringIndexMap::<String>);

impl Vars {
    #[inline(always)]
    pub fn get(&self, name: &str) -> Option::<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[inline]
    pub fn set(&mut self, name: &str, value: &str) {
        match self.0.get_mut(name) {
            Some(old) => {
                old.clear();
                old.push_str(value)
            },
            None => { self.0.insert(name.to_owned(), value.to_owned()); }
        }
    }

    #[inline(always)]
    pub fn iter(&self) -> impl Iterator::<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
