pub mod engine;
pub mod rewards;
pub mod side;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod test_items;
#[cfg(test)]
mod test_rewards;
#[cfg(test)]
mod test_status;
