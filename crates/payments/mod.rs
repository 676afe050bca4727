pub mod chargebee_client;
