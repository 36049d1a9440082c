/*
 * Responsibility
 * - Casdoor token check and the strict authentication gate (auth)
 * - Transport layers: request id, tracing, limits (http)
 * - Browser CORS policy (cors)
 */
pub mod auth;
pub mod cors;
pub mod http;
