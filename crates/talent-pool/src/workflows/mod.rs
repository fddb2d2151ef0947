pub mod talentpool;
