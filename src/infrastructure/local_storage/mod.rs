pub mod report_commit_adapter;
