mod endpoint;
mod postman;
mod search;

pub use endpoint::{
    BodyValue, Category, CodeExample, CodeLanguage, Country, CountryCode, Endpoint,
    EndpointCatalog, EndpointGroup, EndpointHeader, EndpointResponse, RequestBody, COUNTRIES,
};
pub use postman::{
    BodySpec, Collection, CollectionInfo, CollectionItem, HeaderSpec, RequestSpec, RequestUrl,
    ResponseSpec, UrlSpec,
};
pub use search::{SearchOptions, SearchResult, SearchResultType};
