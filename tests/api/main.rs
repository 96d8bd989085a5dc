mod helpers;
mod mailjet_client;
