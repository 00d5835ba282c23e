use crate::{Result, error::GeocachingError};

pub mod v6;

/// Marker for types that can be decoded from a service response stream
pub trait GeocachingJsonResponse: serde::de::DeserializeOwned {}

impl<T: GeocachingJsonResponse> GeocachingJsonResponse for Vec<T> {}

pub trait GeocachingJsonDecode: std::io::Read {
    /// Decodes exactly one JSON value from the stream
    ///
    /// The value is read token by token; the body is never buffered as a
    /// whole. Anything but whitespace after the value is a decode error.
    /// A failure of the underlying stream (timeout, reset) is a network
    /// error instead.
    fn read_response<Res>(self) -> Result<Res>
    where
        Self: Sized,
        Res: GeocachingJsonResponse,
    {
        let mut de = serde_json::Deserializer::from_reader(std::io::BufReader::new(self));
        let response = Res::deserialize(&mut de).map_err(GeocachingError::from_decode)?;
        de.end().map_err(GeocachingError::from_decode)?;
        Ok(response)
    }
}

impl<R: std::io::Read + ?Sized> GeocachingJsonDecode for R {}

/// One optional piece of search criteria
///
/// A filter knows its wire name, whether its own fields make up a usable
/// criterion, and how to append itself to a query object.
pub trait Filter: std::fmt::Debug {
    /// Stable wire name, used as the key in the query object
    fn name(&self) -> &'static str;

    /// Whether this filter may be written
    ///
    /// Must be pure and depend only on the filter's own fields.
    fn is_valid(&self) -> bool;

    /// The JSON body written under [`Filter::name`]
    fn body(&self) -> serde_json::Result<serde_json::Value>;

    /// Appends `name: {...}` to the query
    ///
    /// Fails with [`GeocachingError::InvalidFilter`] when the filter is not
    /// valid: an empty body could be read by the service as "match all".
    fn write_to(&self, query: &mut v6::filter::QueryBuilder) -> Result<()> {
        if !self.is_valid() {
            return Err(GeocachingError::InvalidFilter(self.name()));
        }

        let body = self.body().map_err(GeocachingError::Serialize)?;
        query.insert(self.name(), body);
        Ok(())
    }
}
