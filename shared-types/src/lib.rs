pub mod auth;
pub mod company;
pub mod contact;
pub mod import;

pub use auth::{
    AuthResponse, CompanyMembership, LoginRequest, RefreshTokenRequest, RegisterRequest,
    SessionUser, TokenPair,
};
pub use company::{Company, CreateCompanyRequest};
pub use contact::{
    CompanyContactRequest, Contact, ContactPayload, ContactRecord, ImportContactsRequest,
    ImportContactsResponse, ImportSummary, PageMeta, PaginatedContacts,
};
pub use import::{ErrorMessage, ErrorResponse, ImportError};

/// Outcome of decoding one uploaded CSV file.
pub type DecodeResult = Result<Vec<ContactRecord>, ImportError>;
