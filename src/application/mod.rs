pub mod shipment_service;
