//! MyParcel endpoints and the operations the SDK knows how to address.
//!
//! # Design
//! Each operation maps to one method, one resource and one header prefix.
//! The mapping is an exhaustive `match`, so adding a `RequestKind` variant
//! does not compile until its row is filled in.

use crate::http::HttpMethod;

/// Production API root.
pub const BASE_URL: &str = "https://api.myparcel.nl";

/// Product token used in the `User-Agent` header.
pub const SDK_NAME: &str = "MyParcelNL-SDK";

/// REST collection a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Shipments,
    ShipmentLabels,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Shipments => "shipments",
            Resource::ShipmentLabels => "shipment_labels",
        }
    }
}

/// API operations, each with its own content negotiation header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    CreateShipment,
    RetrieveShipment,
    RetrieveLabelLink,
    RetrieveLabelPdf,
    ReturnShipment,
    DeleteShipment,
}

impl RequestKind {
    pub const ALL: [RequestKind; 6] = [
        RequestKind::CreateShipment,
        RequestKind::RetrieveShipment,
        RequestKind::RetrieveLabelLink,
        RequestKind::RetrieveLabelPdf,
        RequestKind::ReturnShipment,
        RequestKind::DeleteShipment,
    ];

    /// Header line without its charset; `RequestSpec::configure` appends
    /// `charset=utf-8`.
    pub fn header_prefix(self) -> &'static str {
        match self {
            RequestKind::CreateShipment => "Content-Type: application/vnd.shipment+json; ",
            RequestKind::RetrieveShipment => "Accept: application/json; ",
            RequestKind::RetrieveLabelLink => "Accept: application/json; ",
            RequestKind::RetrieveLabelPdf => "Accept: application/pdf; ",
            RequestKind::ReturnShipment => "Content-Type: application/vnd.return_shipment+json; ",
            RequestKind::DeleteShipment => "Accept: application/json; ",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            RequestKind::CreateShipment | RequestKind::ReturnShipment => HttpMethod::Post,
            RequestKind::RetrieveShipment
            | RequestKind::RetrieveLabelLink
            | RequestKind::RetrieveLabelPdf => HttpMethod::Get,
            RequestKind::DeleteShipment => HttpMethod::Delete,
        }
    }

    pub fn resource(self) -> Resource {
        match self {
            RequestKind::RetrieveLabelLink | RequestKind::RetrieveLabelPdf => {
                Resource::ShipmentLabels
            }
            _ => Resource::Shipments,
        }
    }
}
