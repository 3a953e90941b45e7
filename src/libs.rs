pub(crate) mod submitter;
