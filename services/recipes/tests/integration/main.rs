mod db_test;
mod recipe_test;
mod relation_test;
mod router_test;
